#![cfg_attr(feature = "mock", allow(dead_code, unused_imports))]

use anyhow::{Context, Result, bail};
use futures_util::{SinkExt, StreamExt};
use log::{debug, warn};
#[cfg(feature = "mock")]
use mockall::automock;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};
use trait_variant::make;

/// Text-frame channel to the device
#[make(Send)]
#[cfg_attr(feature = "mock", automock)]
pub trait Transport {
    fn is_open(&self) -> bool;
    async fn send(&mut self, text: String) -> Result<()>;
    /// Next inbound text frame, `None` once the channel is closed
    async fn recv(&mut self) -> Option<Result<String>>;
    async fn close(&mut self) -> Result<()>;
}

/// WebSocket connection to the device's `/ws` endpoint
pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    open: bool,
}

impl WsTransport {
    pub async fn connect(url: &str) -> Result<Self> {
        debug!("connect() called with {url}");

        let (stream, response) = connect_async(url)
            .await
            .with_context(|| format!("failed to connect to {url}"))?;

        debug!("websocket handshake done: {}", response.status());

        Ok(Self { stream, open: true })
    }
}

impl Transport for WsTransport {
    fn is_open(&self) -> bool {
        self.open
    }

    async fn send(&mut self, text: String) -> Result<()> {
        if !self.open {
            bail!("websocket is closed");
        }

        if let Err(e) = self.stream.send(Message::text(text)).await {
            self.open = false;
            return Err(e).context("failed to send websocket frame");
        }

        Ok(())
    }

    async fn recv(&mut self) -> Option<Result<String>> {
        while self.open {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Some(Ok(text.as_str().to_owned())),
                Some(Ok(Message::Binary(bytes))) => {
                    return Some(
                        String::from_utf8(bytes.to_vec()).context("binary frame is not utf-8"),
                    );
                }
                Some(Ok(Message::Close(frame))) => {
                    debug!("websocket closed by device: {frame:?}");
                    self.open = false;
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    warn!("websocket receive failed: {e}");
                    self.open = false;
                    return Some(Err(e).context("failed to receive websocket frame"));
                }
                None => self.open = false,
            }
        }

        None
    }

    async fn close(&mut self) -> Result<()> {
        if !self.open {
            return Ok(());
        }

        self.open = false;
        self.stream
            .close(None)
            .await
            .context("failed to close websocket")
    }
}
