// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use super::transport::TransportError;

/// Errors raised by the sync engine.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The delta request failed; the pass is abandoned with the cursor unchanged.
    #[error("remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// One item could not be fetched or decoded.
    #[error("failed to fetch item {key}: {reason}")]
    ItemFetch { key: String, reason: String },

    #[error("storage error: {0}")]
    Storage(#[from] bibsync_core::Error),

    /// The stream answered the handshake with something other than a clean confirmation.
    #[error("handshake failed: {0}")]
    Handshake(#[from] HandshakeError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Validation failures of the stream handshake.
///
/// These end the subscription manager; they are not retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandshakeError {
    #[error("expected 'connected' greeting, got '{0}'")]
    UnexpectedGreeting(String),

    #[error("expected 'subscriptionsCreated', got '{0}'")]
    UnexpectedConfirmation(String),

    #[error("server confirmed different subscriptions than requested")]
    SubscriptionMismatch,

    #[error("subscription rejected: {0}")]
    Rejected(String),

    #[error("malformed frame: {0}")]
    Malformed(String),
}
