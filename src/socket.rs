//! Push Channel
//!
//! One WebSocket connection to `/ws` for the lifetime of the client. Text
//! frames are forwarded to the dashboard untouched; routing happens there.
//! There is no reconnection: once closed, the channel stays closed.

use crate::events::{ConnectionEvent, Event};
use futures::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};

pub struct PushChannel {
    url: String,
    event_tx: mpsc::Sender<Event>,
}

impl PushChannel {
    pub fn new(url: impl Into<String>, event_tx: mpsc::Sender<Event>) -> Self {
        Self {
            url: url.into(),
            event_tx,
        }
    }

    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    async fn notify(&self, event: ConnectionEvent) {
        let _ = self.event_tx.send(Event::Connection(event)).await;
    }

    /// Connect once and pump frames until the server, the network or the
    /// user ends it. Always finishes with [`ConnectionEvent::Closed`].
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let connected = tokio::select! {
            result = connect_async(self.url.as_str()) => result,
            _ = shutdown.recv() => return,
        };

        let ws_stream = match connected {
            Ok((ws_stream, _)) => {
                log::debug!("Push channel connected to {}", self.url);
                self.notify(ConnectionEvent::Opened).await;
                ws_stream
            }
            Err(e) => {
                self.notify(ConnectionEvent::Error(e.to_string())).await;
                self.notify(ConnectionEvent::Closed).await;
                return;
            }
        };

        let (mut write, mut read) = ws_stream.split();

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    let _ = write.send(Message::Close(None)).await;
                    break;
                }
                msg = read.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        let frame = Event::Frame(text.as_str().to_string());
                        if self.event_tx.send(frame).await.is_err() {
                            // Dashboard is gone
                            return;
                        }
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        let _ = write.send(Message::Pong(payload)).await;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        log::debug!("Push channel closed by server: {:?}", frame);
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        self.notify(ConnectionEvent::Error(e.to_string())).await;
                        break;
                    }
                    None => break,
                },
            }
        }

        self.notify(ConnectionEvent::Closed).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn next_event(rx: &mut mpsc::Receiver<Event>) -> Event {
        tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for an event")
            .expect("channel closed")
    }

    #[tokio::test]
    async fn test_frames_then_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            ws.send(Message::Text(r#"{"type":"log","data":"hello"}"#.into()))
                .await
                .unwrap();
            ws.close(None).await.unwrap();
        });

        let (tx, mut rx) = mpsc::channel(16);
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = PushChannel::new(format!("ws://{}/ws", addr), tx).spawn(shutdown_rx);

        assert!(matches!(
            next_event(&mut rx).await,
            Event::Connection(ConnectionEvent::Opened)
        ));
        match next_event(&mut rx).await {
            Event::Frame(text) => assert_eq!(text, r#"{"type":"log","data":"hello"}"#),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(matches!(
            next_event(&mut rx).await,
            Event::Connection(ConnectionEvent::Closed)
        ));

        handle.await.unwrap();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_connect_reports_error_then_close() {
        // Bind and drop to get a port nobody listens on
        let addr = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap()
            .local_addr()
            .unwrap();

        let (tx, mut rx) = mpsc::channel(16);
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
        PushChannel::new(format!("ws://{}/ws", addr), tx)
            .run(shutdown_rx)
            .await;

        assert!(matches!(
            next_event(&mut rx).await,
            Event::Connection(ConnectionEvent::Error(_))
        ));
        assert!(matches!(
            next_event(&mut rx).await,
            Event::Connection(ConnectionEvent::Closed)
        ));
        assert!(rx.try_recv().is_err());
    }
}
