// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the transport module.

#![allow(clippy::unwrap_used)]

use super::transport::{
    BoxFuture, Transport, TransportError, TransportResult, WebSocketTransport,
};
use bibsync_core::{ClientFrame, ServerFrame, Subscription};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One scripted event on a mock connection.
#[derive(Debug, Clone)]
pub enum Step {
    /// Deliver this text frame.
    Frame(String),
    /// Fail the receive with this message.
    Fail(String),
    /// Close the connection.
    Close,
    /// Never deliver anything.
    Hang,
}

impl Step {
    pub fn frame(frame: ServerFrame) -> Step {
        Step::Frame(frame.to_json().unwrap())
    }

    pub fn raw(text: &str) -> Step {
        Step::Frame(text.to_string())
    }
}

#[derive(Default)]
struct MockState {
    /// Scripts for upcoming connections, one per successful connect.
    sessions: VecDeque<VecDeque<Step>>,
    /// Script of the live connection.
    current: VecDeque<Step>,
    connect_failures: u32,
    connects: u32,
    disconnects: u32,
    outgoing: Vec<ClientFrame>,
}

/// Mock transport for testing without real sockets.
///
/// Clones share their script and counters, so a test keeps one clone to
/// inspect what the code under test did with the other. A connection whose
/// script runs out hangs instead of closing.
#[derive(Clone, Default)]
pub struct MockTransport {
    connected: bool,
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next successful connection.
    pub fn push_session(&self, steps: Vec<Step>) {
        self.state
            .lock()
            .unwrap()
            .sessions
            .push_back(steps.into());
    }

    /// Make the next `n` connects fail.
    pub fn fail_connects(&self, n: u32) {
        self.state.lock().unwrap().connect_failures = n;
    }

    /// Number of successful connects.
    pub fn connects(&self) -> u32 {
        self.state.lock().unwrap().connects
    }

    pub fn disconnects(&self) -> u32 {
        self.state.lock().unwrap().disconnects
    }

    /// Get all frames that were sent.
    pub fn outgoing(&self) -> Vec<ClientFrame> {
        self.state.lock().unwrap().outgoing.clone()
    }
}

impl Transport for MockTransport {
    fn connect(&mut self, _url: &str) -> BoxFuture<'_, TransportResult<()>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            if state.connect_failures > 0 {
                state.connect_failures -= 1;
                return Err(TransportError::ConnectionFailed("mock failure".into()));
            }
            state.connects += 1;
            state.current = state.sessions.pop_front().unwrap_or_default();
            drop(state);
            self.connected = true;
            Ok(())
        })
    }

    fn disconnect(&mut self) -> BoxFuture<'_, TransportResult<()>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.disconnects += 1;
            state.current.clear();
            drop(state);
            self.connected = false;
            Ok(())
        })
    }

    fn send(&mut self, frame: ClientFrame) -> BoxFuture<'_, TransportResult<()>> {
        Box::pin(async move {
            if !self.connected {
                return Err(TransportError::ConnectionClosed);
            }
            self.state.lock().unwrap().outgoing.push(frame);
            Ok(())
        })
    }

    fn recv(&mut self) -> BoxFuture<'_, TransportResult<Option<String>>> {
        Box::pin(async move {
            if !self.connected {
                return Err(TransportError::ConnectionClosed);
            }
            let step = self
                .state
                .lock()
                .unwrap()
                .current
                .pop_front()
                .unwrap_or(Step::Hang);
            match step {
                Step::Frame(text) => Ok(Some(text)),
                Step::Fail(reason) => {
                    self.connected = false;
                    Err(TransportError::ReceiveFailed(reason))
                }
                Step::Close => {
                    self.connected = false;
                    Ok(None)
                }
                Step::Hang => std::future::pending().await,
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[tokio::test]
async fn test_mock_transport_connect() {
    let mut transport = MockTransport::new();
    assert!(!transport.is_connected());

    transport.connect("ws://localhost:1234").await.unwrap();
    assert!(transport.is_connected());

    transport.disconnect().await.unwrap();
    assert!(!transport.is_connected());
    assert_eq!(transport.connects(), 1);
    assert_eq!(transport.disconnects(), 1);
}

#[tokio::test]
async fn test_mock_transport_plays_session_script() {
    let mut transport = MockTransport::new();
    transport.push_session(vec![Step::frame(ServerFrame::connected()), Step::Close]);
    transport.connect("ws://localhost:1234").await.unwrap();

    let frame = ClientFrame::create_subscriptions(vec![Subscription::for_group("k", "1")]);
    transport.send(frame.clone()).await.unwrap();
    assert_eq!(transport.outgoing(), vec![frame]);

    let text = transport.recv().await.unwrap().unwrap();
    assert_eq!(ServerFrame::from_json(&text).unwrap(), ServerFrame::connected());

    assert!(transport.recv().await.unwrap().is_none());
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_mock_transport_connect_fail() {
    let mut transport = MockTransport::new();
    transport.fail_connects(1);

    let result = transport.connect("ws://localhost:1234").await;
    assert!(matches!(result, Err(TransportError::ConnectionFailed(_))));
    assert!(!transport.is_connected());

    transport.connect("ws://localhost:1234").await.unwrap();
    assert_eq!(transport.connects(), 1);
}

#[tokio::test]
async fn test_mock_transport_recv_failure_disconnects() {
    let mut transport = MockTransport::new();
    transport.push_session(vec![Step::Fail("reset".into())]);
    transport.connect("ws://localhost:1234").await.unwrap();

    let result = transport.recv().await;
    assert!(matches!(result, Err(TransportError::ReceiveFailed(_))));
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_websocket_transport_exchanges_text_frames() {
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        ws.send(Message::Text(r#"{"event":"connected"}"#.into()))
            .await
            .unwrap();
        let received = loop {
            match ws.next().await.unwrap().unwrap() {
                Message::Text(text) => break text.to_string(),
                _ => continue,
            }
        };
        ws.close(None).await.unwrap();
        received
    });

    let mut transport = WebSocketTransport::new();
    transport.connect(&format!("ws://{addr}")).await.unwrap();
    assert!(transport.is_connected());

    let greeting = transport.recv().await.unwrap().unwrap();
    assert_eq!(greeting, r#"{"event":"connected"}"#);

    let frame = ClientFrame::create_subscriptions(vec![Subscription::for_group("k", "7")]);
    transport.send(frame.clone()).await.unwrap();

    assert!(transport.recv().await.unwrap().is_none());
    assert!(!transport.is_connected());

    let received = server.await.unwrap();
    assert_eq!(ClientFrame::from_json(&received).unwrap(), frame);
}

#[tokio::test]
async fn test_websocket_transport_connect_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut transport = WebSocketTransport::new();
    let result = transport.connect(&format!("ws://{addr}")).await;
    assert!(matches!(result, Err(TransportError::ConnectionFailed(_))));
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_websocket_transport_send_without_connection() {
    let mut transport = WebSocketTransport::new();
    let frame = ClientFrame::create_subscriptions(vec![]);
    let result = transport.send(frame).await;
    assert_eq!(result, Err(TransportError::ConnectionClosed));
}
