// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Library synchronization engine.
//!
//! Keeps the local store current with the remote group library by combining
//! catch-up passes over the REST API with a live push-stream subscription.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Subscription │────►│  Transport  │────►│   Stream    │
//! │   Manager    │◄────│   (trait)   │◄────│   Server    │
//! └──────────────┘     └─────────────┘     └─────────────┘
//!        │ topicUpdated
//!        ▼
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │     Sync     │────►│ LibraryApi  │────►│  REST API   │
//! │ Orchestrator │     │   (trait)   │     └─────────────┘
//! └──────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │  SyncStore   │  (cursor + entries)
//! │   (trait)    │
//! └──────────────┘
//! ```
//!
//! # Features
//!
//! - Version cursor that only moves forward
//! - Per-item outcomes so one bad item never blocks a pass
//! - Serialized passes
//! - Handshake timeout with fixed-delay reconnect
//! - Injectable transport, API and store traits for testing

mod api;
mod error;
mod orchestrator;
mod state;
mod store;
mod subscription;
mod transport;

pub use api::{
    delta_from_versions, is_valid_item_key, parse_backoff, ApiConfig, Delta, FetchedItem,
    HttpLibraryApi, LibraryApi,
};
pub use error::{HandshakeError, SyncError};
pub use orchestrator::{ItemOutcome, PassSummary, SyncOrchestrator};
pub use state::{SharedSubscriptionState, SubscriptionState};
pub use store::{SharedDatabase, SyncStore};
pub use subscription::{
    validate_confirmation, validate_greeting, SubscriptionConfig, SubscriptionManager,
};
pub use transport::{
    BoxFuture, Transport, TransportError, TransportResult, WebSocketTransport,
};

#[cfg(test)]
mod test_helpers;






#[cfg(test)]
mod transport_tests;
