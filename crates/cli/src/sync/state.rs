// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription state tracked by the manager, logged on every transition.

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use tracing::debug;

/// Where the subscription manager is in its handshake and receive loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SubscriptionState {
    Disconnected = 0,
    Connecting = 1,
    AwaitingConnectConfirmation = 2,
    Authenticating = 3,
    AwaitingAuthConfirmation = 4,
    Subscribed = 5,
    Syncing = 6,
}

impl SubscriptionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => SubscriptionState::Connecting,
            2 => SubscriptionState::AwaitingConnectConfirmation,
            3 => SubscriptionState::Authenticating,
            4 => SubscriptionState::AwaitingAuthConfirmation,
            5 => SubscriptionState::Subscribed,
            6 => SubscriptionState::Syncing,
            _ => SubscriptionState::Disconnected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionState::Disconnected => "disconnected",
            SubscriptionState::Connecting => "connecting",
            SubscriptionState::AwaitingConnectConfirmation => "awaiting connect confirmation",
            SubscriptionState::Authenticating => "authenticating",
            SubscriptionState::AwaitingAuthConfirmation => "awaiting auth confirmation",
            SubscriptionState::Subscribed => "subscribed",
            SubscriptionState::Syncing => "syncing",
        }
    }
}

impl fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State shared between the manager task and observers.
///
/// Uses atomic fields for lock-free reads.
pub struct SharedSubscriptionState {
    state: AtomicU8,
    /// Connection attempts since the last successful subscription.
    attempt: AtomicU32,
}

impl SharedSubscriptionState {
    /// Create a new shared state initialized to disconnected.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(SubscriptionState::Disconnected as u8),
            attempt: AtomicU32::new(0),
        }
    }

    pub fn get(&self) -> SubscriptionState {
        SubscriptionState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn set(&self, state: SubscriptionState) {
        self.state.store(state as u8, Ordering::Release);
        debug!(status = %self.status_string(), "subscription state changed");
    }

    pub fn attempt(&self) -> u32 {
        self.attempt.load(Ordering::Acquire)
    }

    /// Count a new connection attempt and return its number.
    pub fn next_attempt(&self) -> u32 {
        self.attempt.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn reset_attempts(&self) {
        self.attempt.store(0, Ordering::Release);
    }

    /// True while the subscription is confirmed, including during a pass.
    pub fn is_subscribed(&self) -> bool {
        matches!(
            self.get(),
            SubscriptionState::Subscribed | SubscriptionState::Syncing
        )
    }

    /// Get a human-readable status string.
    pub fn status_string(&self) -> String {
        let state = self.get();
        let attempt = self.attempt();
        match state {
            SubscriptionState::Connecting if attempt > 1 => {
                format!("connecting (attempt {})", attempt)
            }
            _ => state.to_string(),
        }
    }
}

impl Default for SharedSubscriptionState {
    fn default() -> Self {
        Self::new()
    }
}
