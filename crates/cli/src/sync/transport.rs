// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push-stream transport.
//!
//! The subscription manager talks to a [`Transport`]; production uses
//! [`WebSocketTransport`], tests script a mock.
//!
//! Incoming frames are handed up as raw text. Decoding happens in the
//! subscription manager, which treats a malformed greeting differently from a
//! malformed notification.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bibsync_core::ClientFrame;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// Error type for transport operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// No open connection, or the peer closed it.
    #[error("connection closed")]
    ConnectionClosed,

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// No frame arrived in time.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// A client frame could not be encoded.
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by [`Transport`] methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A bidirectional text-frame channel to the stream server.
pub trait Transport: Send + Sync {
    fn connect(&mut self, url: &str) -> BoxFuture<'_, TransportResult<()>>;

    /// Close the connection. Succeeds when already disconnected.
    fn disconnect(&mut self) -> BoxFuture<'_, TransportResult<()>>;

    fn send(&mut self, frame: ClientFrame) -> BoxFuture<'_, TransportResult<()>>;

    /// Next text frame, or `None` once the peer has closed the connection.
    fn recv(&mut self) -> BoxFuture<'_, TransportResult<Option<String>>>;

    fn is_connected(&self) -> bool;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct Connection {
    writer: SplitSink<WsStream, Message>,
    reader: SplitStream<WsStream>,
}

/// What a single WebSocket message means to the stream protocol.
enum Incoming {
    Text(String),
    Closed,
    Ignored,
}

impl From<Message> for Incoming {
    fn from(message: Message) -> Self {
        match message {
            Message::Text(text) => Incoming::Text(text.as_str().to_owned()),
            Message::Close(_) => Incoming::Closed,
            // tungstenite answers pings itself; the protocol has no binary frames
            _ => Incoming::Ignored,
        }
    }
}

/// [`Transport`] over tokio-tungstenite, with TLS for `wss://` URLs.
#[derive(Default)]
pub struct WebSocketTransport {
    conn: Option<Connection>,
}

impl WebSocketTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn connection(&mut self) -> TransportResult<&mut Connection> {
        self.conn.as_mut().ok_or(TransportError::ConnectionClosed)
    }
}

impl Transport for WebSocketTransport {
    fn connect(&mut self, url: &str) -> BoxFuture<'_, TransportResult<()>> {
        let url = url.to_string();
        Box::pin(async move {
            let (stream, _response) = tokio_tungstenite::connect_async(url.as_str())
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
            let (writer, reader) = stream.split();
            self.conn = Some(Connection { writer, reader });
            Ok(())
        })
    }

    fn disconnect(&mut self) -> BoxFuture<'_, TransportResult<()>> {
        Box::pin(async move {
            if let Some(mut conn) = self.conn.take() {
                // The peer may already be gone
                let _ = conn.writer.close().await;
            }
            Ok(())
        })
    }

    fn send(&mut self, frame: ClientFrame) -> BoxFuture<'_, TransportResult<()>> {
        Box::pin(async move {
            let json = frame
                .to_json()
                .map_err(|e| TransportError::SerializationError(e.to_string()))?;
            let sent = self.connection()?.writer.send(Message::Text(json.into())).await;
            sent.map_err(|e| {
                self.conn = None;
                TransportError::SendFailed(e.to_string())
            })
        })
    }

    fn recv(&mut self) -> BoxFuture<'_, TransportResult<Option<String>>> {
        Box::pin(async move {
            loop {
                let next = self.connection()?.reader.next().await;
                let incoming = match next {
                    Some(Ok(message)) => Incoming::from(message),
                    Some(Err(e)) => {
                        self.conn = None;
                        return Err(TransportError::ReceiveFailed(e.to_string()));
                    }
                    None => Incoming::Closed,
                };
                match incoming {
                    Incoming::Text(text) => return Ok(Some(text)),
                    Incoming::Closed => {
                        self.conn = None;
                        return Ok(None);
                    }
                    Incoming::Ignored => {}
                }
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.conn.is_some()
    }
}
