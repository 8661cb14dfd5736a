// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Live subscription to library change notifications.
//!
//! The manager runs a catch-up pass, then loops over connections:
//!
//! ```text
//! Disconnected ─► Connecting ─► AwaitingConnectConfirmation ─► Authenticating
//!      ▲                                                            │
//!      │ transport failure,                                         ▼
//!      │ wait retry_delay                             AwaitingAuthConfirmation
//!      │                                                            │ confirmed
//!      └──────────────────── Subscribed ◄──── Syncing ◄─────────────┘
//!                                │  topicUpdated  ▲
//!                                └────────────────┘
//! ```
//!
//! Transport failures (connect, send, close, read error, confirmation
//! timeout) reconnect after a fixed delay. A handshake the server answers
//! with the wrong content ends the manager.

use std::sync::Arc;
use std::time::Duration;

use bibsync_core::{library_topic, ClientFrame, ServerFrame, Subscription};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::api::LibraryApi;
use super::error::{HandshakeError, SyncError};
use super::orchestrator::SyncOrchestrator;
use super::state::{SharedSubscriptionState, SubscriptionState};
use super::store::SyncStore;
use super::transport::{Transport, TransportError};

/// Settings for [`SubscriptionManager`].
#[derive(Debug, Clone)]
pub struct SubscriptionConfig {
    /// Stream endpoint, e.g. `wss://stream.zotero.org`.
    pub url: String,
    pub api_key: String,
    pub group: String,
    /// How long to wait for the subscription confirmation.
    pub auth_timeout: Duration,
    /// Pause before reconnecting after a transport failure.
    pub retry_delay: Duration,
}

impl SubscriptionConfig {
    /// The subscription request sent on every connection.
    pub fn subscriptions(&self) -> Vec<Subscription> {
        vec![Subscription::for_group(&self.api_key, &self.group)]
    }
}

/// Why a connection ended.
#[derive(Debug)]
enum Disconnect {
    /// The transport broke. `subscribed` is set when the subscription had
    /// been confirmed, meaning notifications may have been missed.
    Transport {
        error: TransportError,
        subscribed: bool,
    },
    /// The server answered the handshake with the wrong content.
    Rejected(HandshakeError),
}

impl Disconnect {
    fn before_subscribed(error: TransportError) -> Self {
        Disconnect::Transport {
            error,
            subscribed: false,
        }
    }
}

/// Check a confirmation frame against the subscriptions that were requested.
pub fn validate_confirmation(text: &str, requested: &[Subscription]) -> Result<(), HandshakeError> {
    let frame =
        ServerFrame::from_json(text).map_err(|e| HandshakeError::Malformed(e.to_string()))?;
    match frame {
        ServerFrame::SubscriptionsCreated {
            subscriptions,
            errors,
        } => {
            if !errors.is_empty() {
                let reasons: Vec<String> = errors
                    .iter()
                    .map(|e| match &e.topic {
                        Some(topic) => format!("{topic}: {}", e.error),
                        None => e.error.clone(),
                    })
                    .collect();
                return Err(HandshakeError::Rejected(reasons.join("; ")));
            }
            if subscriptions != requested {
                return Err(HandshakeError::SubscriptionMismatch);
            }
            Ok(())
        }
        other => Err(HandshakeError::UnexpectedConfirmation(
            other.event_name().to_string(),
        )),
    }
}

/// Check the server's greeting.
pub fn validate_greeting(text: &str) -> Result<(), HandshakeError> {
    match ServerFrame::from_json(text) {
        Ok(ServerFrame::Connected { .. }) => Ok(()),
        Ok(other) => Err(HandshakeError::UnexpectedGreeting(
            other.event_name().to_string(),
        )),
        Err(e) => Err(HandshakeError::Malformed(e.to_string())),
    }
}

/// Keeps the local store current by following the library's push stream.
pub struct SubscriptionManager<T, A, S> {
    config: SubscriptionConfig,
    transport: T,
    orchestrator: Arc<SyncOrchestrator<A, S>>,
    state: Arc<SharedSubscriptionState>,
}

impl<T: Transport, A: LibraryApi, S: SyncStore> SubscriptionManager<T, A, S> {
    pub fn new(
        config: SubscriptionConfig,
        transport: T,
        orchestrator: Arc<SyncOrchestrator<A, S>>,
    ) -> Self {
        SubscriptionManager {
            config,
            transport,
            orchestrator,
            state: Arc::new(SharedSubscriptionState::new()),
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> Arc<SharedSubscriptionState> {
        Arc::clone(&self.state)
    }

    /// Run until cancelled or until the handshake is rejected.
    ///
    /// Returns `Ok(())` on cancellation and [`SyncError::Handshake`] when the
    /// server's greeting or confirmation fails validation.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<(), SyncError> {
        let topic = library_topic(&self.config.group);
        info!(url = %self.config.url, topic = %topic, "starting library subscription");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            _ = self.sync("catch-up") => {}
        }

        let mut missed_updates = false;
        loop {
            let disconnect = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                disconnect = self.run_connection(missed_updates) => disconnect,
            };

            self.close().await;

            match disconnect {
                Disconnect::Rejected(e) => {
                    error!(error = %e, "subscription handshake rejected, giving up");
                    return Err(SyncError::Handshake(e));
                }
                Disconnect::Transport { error, subscribed } => {
                    missed_updates |= subscribed;
                    warn!(
                        error = %error,
                        retry_in_secs = self.config.retry_delay.as_secs(),
                        "subscription connection lost, reconnecting"
                    );
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.config.retry_delay) => {}
            }
        }

        self.close().await;
        info!("library subscription stopped");
        Ok(())
    }

    async fn close(&mut self) {
        if self.transport.is_connected() {
            let _ = self.transport.disconnect().await;
        }
        self.state.set(SubscriptionState::Disconnected);
    }

    /// Run one sync pass, logging its result.
    async fn sync(&self, reason: &str) {
        if let Err(e) = self.orchestrator.run_pass().await {
            error!(reason, error = %e, "sync pass failed");
        }
    }

    /// Connect, subscribe, then follow notifications until the connection ends.
    async fn run_connection(&mut self, missed_updates: bool) -> Disconnect {
        let attempt = self.state.next_attempt();
        self.state.set(SubscriptionState::Connecting);
        debug!(attempt, "connecting to stream");

        if let Err(e) = self.transport.connect(&self.config.url).await {
            return Disconnect::before_subscribed(e);
        }

        self.state.set(SubscriptionState::AwaitingConnectConfirmation);
        let greeting = match self.transport.recv().await {
            Ok(Some(text)) => text,
            Ok(None) => return Disconnect::before_subscribed(TransportError::ConnectionClosed),
            Err(e) => return Disconnect::before_subscribed(e),
        };
        if let Err(e) = validate_greeting(&greeting) {
            return Disconnect::Rejected(e);
        }

        self.state.set(SubscriptionState::Authenticating);
        let requested = self.config.subscriptions();
        let request = ClientFrame::create_subscriptions(requested.clone());
        if let Err(e) = self.transport.send(request).await {
            return Disconnect::before_subscribed(e);
        }

        self.state.set(SubscriptionState::AwaitingAuthConfirmation);
        let confirmation =
            match tokio::time::timeout(self.config.auth_timeout, self.transport.recv()).await {
                Ok(Ok(Some(text))) => text,
                Ok(Ok(None)) => {
                    return Disconnect::before_subscribed(TransportError::ConnectionClosed)
                }
                Ok(Err(e)) => return Disconnect::before_subscribed(e),
                Err(_) => {
                    return Disconnect::before_subscribed(TransportError::Timeout(
                        self.config.auth_timeout,
                    ))
                }
            };
        if let Err(e) = validate_confirmation(&confirmation, &requested) {
            return Disconnect::Rejected(e);
        }

        self.state.set(SubscriptionState::Subscribed);
        self.state.reset_attempts();
        info!(group = %self.config.group, "subscribed to library updates");

        if missed_updates {
            self.state.set(SubscriptionState::Syncing);
            self.sync("resubscribed").await;
            self.state.set(SubscriptionState::Subscribed);
        }

        loop {
            let text = match self.transport.recv().await {
                Ok(Some(text)) => text,
                Ok(None) => {
                    return Disconnect::Transport {
                        error: TransportError::ConnectionClosed,
                        subscribed: true,
                    }
                }
                Err(error) => {
                    return Disconnect::Transport {
                        error,
                        subscribed: true,
                    }
                }
            };

            match ServerFrame::from_json(&text) {
                Ok(ServerFrame::TopicUpdated { topic, version }) => {
                    info!(topic = topic.as_deref().unwrap_or("-"), version, "library updated");
                    self.state.set(SubscriptionState::Syncing);
                    self.sync("topic updated").await;
                    self.state.set(SubscriptionState::Subscribed);
                }
                Ok(frame) => debug!(event = frame.event_name(), "ignoring stream event"),
                Err(e) => warn!(error = %e, "skipping undecodable stream frame"),
            }
        }
    }
}
