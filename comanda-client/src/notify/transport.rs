use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::ListenerError;

/// Opens text-frame channels to the backend
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn open(&self, url: &str) -> Result<Box<dyn FrameStream>, ListenerError>;
}

/// One open channel
#[async_trait]
pub trait FrameStream: Send {
    /// Next text frame; `None` once the channel closed normally
    async fn next_frame(&mut self) -> Option<Result<String, ListenerError>>;
    async fn close(&mut self);
}

/// WebSocket frame source
#[derive(Debug, Clone, Default)]
pub struct WsFrameSource {
    token: Option<String>,
}

impl WsFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send the session token as a bearer header on upgrade
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[async_trait]
impl FrameSource for WsFrameSource {
    async fn open(&self, url: &str) -> Result<Box<dyn FrameStream>, ListenerError> {
        let mut request = url
            .into_client_request()
            .map_err(|e| ListenerError::Connect(format!("Invalid WS request: {e}")))?;

        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ListenerError::Connect(format!("Invalid token header: {e}")))?;
            request.headers_mut().insert("Authorization", value);
        }

        let (ws, _response) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(|e| ListenerError::Connect(e.to_string()))?;

        Ok(Box::new(WsFrameStream { ws }))
    }
}

struct WsFrameStream {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl FrameStream for WsFrameStream {
    async fn next_frame(&mut self) -> Option<Result<String, ListenerError>> {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => return Some(Ok(text.as_str().to_owned())),
                Some(Ok(Message::Ping(data))) => {
                    if let Err(e) = self.ws.send(Message::Pong(data)).await {
                        return Some(Err(ListenerError::Transport(e.to_string())));
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!(?frame, "WebSocket closed by server");
                    return None;
                }
                Some(Err(e)) => return Some(Err(ListenerError::Transport(e.to_string()))),
                None => return None,
                _ => {} // Binary, Pong - ignore
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.ws.close(None).await {
            tracing::debug!("WebSocket close: {e}");
        }
    }
}
