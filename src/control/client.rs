//! Control Server Client
//!
//! Thin reqwest wrapper for the bot's HTTP control endpoints.

use crate::consts::cli_consts::http;
use crate::control::ControlApi;
use crate::control::error::ControlError;
use crate::control::types::{CommandReply, TradeRecord, TradeStats};
use crate::server::ServerAddress;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("bot-terminal/", env!("CARGO_PKG_VERSION"));

/// HTTP Basic credentials. Without a password, no `Authorization` header is sent.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ControlClient {
    client: Client,
    server: ServerAddress,
    credentials: Option<Credentials>,
}

impl ControlClient {
    /// Requests carry no overall timeout; a slow command is left to finish.
    pub fn new(server: ServerAddress, credentials: Option<Credentials>) -> Self {
        Self {
            client: ClientBuilder::new()
                .connect_timeout(http::connect_timeout())
                .build()
                .expect("Failed to create HTTP client"),
            server,
            credentials,
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(Credentials {
                username,
                password: Some(password),
            }) => request.basic_auth(username, Some(password)),
            _ => request,
        }
    }

    async fn handle_response_status(response: Response) -> Result<Response, ControlError> {
        if !response.status().is_success() {
            return Err(ControlError::from_response(response).await);
        }
        Ok(response)
    }

    async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, ControlError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get_request<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ControlError> {
        let url = self.server.endpoint(endpoint);
        let request = self.client.get(&url).header("User-Agent", USER_AGENT);
        let response = self.authorize(request).send().await?;

        let response = Self::handle_response_status(response).await?;
        Self::decode_response(response).await
    }

    async fn post_request(&self, endpoint: &str, body: &Value) -> Result<Value, ControlError> {
        let url = self.server.endpoint(endpoint);
        let request = self
            .client
            .post(&url)
            .header("User-Agent", USER_AGENT)
            .json(body);
        let response = self.authorize(request).send().await?;

        let response = Self::handle_response_status(response).await?;
        Self::decode_response(response).await
    }
}

#[async_trait::async_trait]
impl ControlApi for ControlClient {
    fn server(&self) -> &ServerAddress {
        &self.server
    }

    async fn post_command(
        &self,
        endpoint: &str,
        payload: Value,
    ) -> Result<CommandReply, ControlError> {
        let body = self.post_request(endpoint, &payload).await?;
        Ok(CommandReply::from_value(&body))
    }

    async fn get_stats(&self) -> Result<TradeStats, ControlError> {
        self.get_request("/get-stats").await
    }

    async fn get_history(&self) -> Result<Vec<TradeRecord>, ControlError> {
        self.get_request("/get-history").await
    }
}
