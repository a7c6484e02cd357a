use crate::consts::cli_consts::{DEFAULT_SERVER_URL, PUSH_CHANNEL_PATH};
use reqwest::Url;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServerUrlError {
    #[error("invalid server URL '{0}': {1}")]
    Invalid(String, String),

    #[error("unsupported scheme '{0}', expected http or https")]
    Scheme(String),
}

/// Base address of the bot's control server.
///
/// Command endpoints hang off this URL; the push channel lives at `/ws` on the
/// same host, using `wss` when the server is reached over `https`.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerAddress {
    base: Url,
}

impl ServerAddress {
    /// Full URL of an HTTP endpoint such as `/set-leverage`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// URL of the push channel.
    pub fn push_channel_url(&self) -> String {
        let scheme = if self.is_secure() { "wss" } else { "ws" };
        let mut url = self.base.clone();
        // http -> ws and https -> wss are both permitted scheme swaps.
        let _ = url.set_scheme(scheme);
        url.set_path(PUSH_CHANNEL_PATH);
        url.set_query(None);
        url.to_string()
    }

    pub fn is_secure(&self) -> bool {
        self.base.scheme() == "https"
    }

    pub fn host(&self) -> String {
        match (self.base.host_str(), self.base.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            _ => self.base.to_string(),
        }
    }
}

impl Default for ServerAddress {
    fn default() -> Self {
        DEFAULT_SERVER_URL
            .parse()
            .expect("Default server URL must parse")
    }
}

impl FromStr for ServerAddress {
    type Err = ServerUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let base = Url::parse(trimmed)
            .map_err(|e| ServerUrlError::Invalid(trimmed.to_string(), e.to_string()))?;
        match base.scheme() {
            "http" | "https" => Ok(Self { base }),
            other => Err(ServerUrlError::Scheme(other.to_string())),
        }
    }
}

impl Display for ServerAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.base.as_str().trim_end_matches('/'))
    }
}

impl Debug for ServerAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ServerAddress({}, push: {})", self, self.push_channel_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_http_uses_ws() {
        let server: ServerAddress = "http://localhost:8000".parse().unwrap();
        assert_eq!(server.push_channel_url(), "ws://localhost:8000/ws");
        assert_eq!(server.endpoint("/start"), "http://localhost:8000/start");
        assert!(!server.is_secure());
    }

    #[test]
    fn test_https_upgrades_to_wss() {
        let server: ServerAddress = "https://bot.example.com/".parse().unwrap();
        assert_eq!(server.push_channel_url(), "wss://bot.example.com/ws");
        assert_eq!(
            server.endpoint("manual-trade/long"),
            "https://bot.example.com/manual-trade/long"
        );
        assert_eq!(server.host(), "bot.example.com");
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert_eq!(
            "ftp://bot.example.com".parse::<ServerAddress>(),
            Err(ServerUrlError::Scheme("ftp".to_string()))
        );
        assert!(matches!(
            "not a url".parse::<ServerAddress>(),
            Err(ServerUrlError::Invalid(_, _))
        ));
    }

    #[test]
    fn test_default_points_at_local_server() {
        let server = ServerAddress::default();
        assert_eq!(server.to_string(), "http://localhost:8000");
        assert_eq!(server.host(), "localhost:8000");
    }
}
