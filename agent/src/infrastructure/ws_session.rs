use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

use crate::application::MarketDataHandler;
use crate::domain::{OrderSink, SendError, SessionState};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Connection error: {0}")]
    Connect(#[source] tungstenite::Error),
    #[error("Connection closed abnormally (code {code:?}): {reason}")]
    AbnormalClosure { code: Option<u16>, reason: String },
    #[error("Transport error: {0}")]
    Transport(#[from] tungstenite::Error),
}

/// Opens the authenticated exchange connection
pub struct WsConnector {
    target: Url,
}

impl WsConnector {
    /// `target` already carries the credential query parameter
    pub fn new(target: Url) -> Self {
        WsConnector { target }
    }

    /// Endpoint without the query string, safe to log
    pub fn endpoint(&self) -> String {
        let mut url = self.target.clone();
        url.set_query(None);
        url.to_string()
    }

    pub async fn connect(&self) -> Result<StreamSession<MaybeTlsStream<TcpStream>>, SessionError> {
        tracing::info!(endpoint = %self.endpoint(), state = ?SessionState::Connecting, "Connecting");

        let (ws_stream, _) = connect_async(self.target.as_str())
            .await
            .map_err(SessionError::Connect)?;

        tracing::info!(endpoint = %self.endpoint(), "Connected to WebSocket");
        Ok(StreamSession::new(ws_stream))
    }
}

/// One live connection feeding the market data handler
///
/// Frames are processed strictly in arrival order. The only suspension
/// points are waiting for the next frame and writing an order back out.
pub struct StreamSession<S> {
    ws: WebSocketStream<S>,
    state: SessionState,
}

impl<S> StreamSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(ws: WebSocketStream<S>) -> Self {
        StreamSession {
            ws,
            state: SessionState::Connected,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Consume frames until the connection closes
    ///
    /// Returns `Ok(ClosedNormal)` for a normal or going-away close frame.
    /// Any other ending is an error and leaves the session `ClosedAbnormal`.
    pub async fn run(&mut self, handler: &mut MarketDataHandler) -> Result<SessionState, SessionError> {
        while let Some(frame) = self.ws.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    handler.handle_text(text.as_str(), &mut self.ws).await;
                }
                Ok(Message::Binary(bytes)) => {
                    handler.handle_binary(&bytes, &mut self.ws).await;
                }
                Ok(Message::Close(frame)) => {
                    // Push out the close reply tungstenite queued for us
                    if let Err(e) = self.ws.flush().await {
                        tracing::debug!(error = %e, "Failed to flush close reply");
                    }
                    return self.finish(close_outcome(frame));
                }
                Ok(Message::Ping(data)) => {
                    tracing::trace!("Received ping: {:?}", data);
                }
                Ok(_) => {}
                Err(e) => {
                    return self.finish(Err(SessionError::Transport(e)));
                }
            }
        }

        self.finish(Err(SessionError::AbnormalClosure {
            code: None,
            reason: "stream ended without close frame".to_string(),
        }))
    }

    fn finish(
        &mut self,
        outcome: Result<SessionState, SessionError>,
    ) -> Result<SessionState, SessionError> {
        self.state = match &outcome {
            Ok(_) => SessionState::ClosedNormal,
            Err(_) => SessionState::ClosedAbnormal,
        };
        outcome.map(|_| self.state)
    }
}

fn close_outcome(frame: Option<CloseFrame>) -> Result<SessionState, SessionError> {
    match frame {
        None => Ok(SessionState::ClosedNormal),
        Some(frame) if matches!(frame.code, CloseCode::Normal | CloseCode::Away) => {
            Ok(SessionState::ClosedNormal)
        }
        Some(frame) => Err(SessionError::AbnormalClosure {
            code: Some(u16::from(frame.code)),
            reason: frame.reason.as_str().to_string(),
        }),
    }
}

/// Orders go straight back out on the same socket
#[async_trait]
impl<S> OrderSink for WebSocketStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send_order(&mut self, command: String) -> Result<(), SendError> {
        self.send(Message::Text(command.into()))
            .await
            .map_err(|e| SendError(e.to_string()))
    }
}
