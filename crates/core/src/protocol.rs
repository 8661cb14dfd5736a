// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push-stream frames exchanged with the library's streaming endpoint.
//!
//! The exchange is short:
//! - Server greets with `connected`
//! - Client sends `createSubscriptions` naming its topics and API key
//! - Server confirms with `subscriptionsCreated`
//! - Server then sends `topicUpdated` whenever a subscribed library changes
//!
//! Server frames are dispatched on their `event` marker alone. Apart from the
//! subscription confirmation, which is validated field by field, the other
//! fields are advisory: a missing or oddly typed `topic`, `version` or
//! `retry` never makes a frame undecodable.

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Topic path for a group library.
pub fn library_topic(group: &str) -> String {
    format!("/groups/{group}")
}

/// One subscription request: an API key and the topics it should follow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Key used to authorize the topics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Topic paths, e.g. `/groups/2556736`.
    pub topics: Vec<String>,
}

impl Subscription {
    /// Subscription following a single group library.
    pub fn for_group(api_key: &str, group: &str) -> Self {
        Subscription {
            api_key: Some(api_key.to_string()),
            topics: vec![library_topic(group)],
        }
    }
}

/// A subscription the server refused.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionFailure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default)]
    pub error: String,
}

/// Frames sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ClientFrame {
    /// Authenticate and subscribe in one step.
    CreateSubscriptions { subscriptions: Vec<Subscription> },
}

/// Frames sent from server to client, discriminated by their `event` field.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerFrame {
    /// Greeting sent as soon as the connection opens.
    Connected {
        /// Suggested reconnect delay in milliseconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        retry: Option<u64>,
    },

    /// Answer to [`ClientFrame::CreateSubscriptions`].
    SubscriptionsCreated {
        /// The subscriptions the server accepted, echoed back.
        #[serde(default)]
        subscriptions: Vec<Subscription>,
        /// Topics that could not be subscribed.
        #[serde(default)]
        errors: Vec<SubscriptionFailure>,
    },

    /// A subscribed topic changed.
    TopicUpdated {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        topic: Option<String>,
        /// Library version after the change.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<i64>,
    },

    /// A topic was added to an existing key's subscription.
    TopicAdded {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        topic: Option<String>,
    },

    /// A topic was removed from an existing key's subscription.
    TopicRemoved {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        topic: Option<String>,
    },

    /// Any event this client does not act on.
    Other,
}

/// Body of a `subscriptionsCreated` frame.
#[derive(Deserialize)]
struct SubscriptionsCreatedBody {
    #[serde(default)]
    subscriptions: Vec<Subscription>,
    #[serde(default)]
    errors: Vec<SubscriptionFailure>,
}

fn text_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_owned)
}

/// A number, or a string holding one.
fn int_field(value: &Value, field: &str) -> Option<i64> {
    let field = value.get(field)?;
    field
        .as_i64()
        .or_else(|| field.as_str().and_then(|s| s.trim().parse().ok()))
}

impl ClientFrame {
    /// Creates a subscription request.
    pub fn create_subscriptions(subscriptions: Vec<Subscription>) -> Self {
        ClientFrame::CreateSubscriptions { subscriptions }
    }

    /// Serializes the frame to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the frame from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerFrame {
    /// Creates a `connected` greeting.
    pub fn connected() -> Self {
        ServerFrame::Connected { retry: None }
    }

    /// Creates a `subscriptionsCreated` confirmation.
    pub fn subscriptions_created(
        subscriptions: Vec<Subscription>,
        errors: Vec<SubscriptionFailure>,
    ) -> Self {
        ServerFrame::SubscriptionsCreated {
            subscriptions,
            errors,
        }
    }

    /// Creates a `topicUpdated` notification.
    pub fn topic_updated(topic: impl Into<String>, version: Option<i64>) -> Self {
        ServerFrame::TopicUpdated {
            topic: Some(topic.into()),
            version,
        }
    }

    /// Wire name of the frame's event.
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerFrame::Connected { .. } => "connected",
            ServerFrame::SubscriptionsCreated { .. } => "subscriptionsCreated",
            ServerFrame::TopicUpdated { .. } => "topicUpdated",
            ServerFrame::TopicAdded { .. } => "topicAdded",
            ServerFrame::TopicRemoved { .. } => "topicRemoved",
            ServerFrame::Other => "other",
        }
    }

    /// Serializes the frame to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes a frame from JSON, dispatching on its `event` marker.
    ///
    /// Fails only when the text is not JSON, has no string `event`, or is a
    /// `subscriptionsCreated` frame whose lists cannot be read.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(s)?;
        let event = value
            .get("event")
            .and_then(Value::as_str)
            .ok_or_else(|| serde_json::Error::missing_field("event"))?;

        let frame = match event {
            "connected" => ServerFrame::Connected {
                retry: int_field(&value, "retry").and_then(|r| u64::try_from(r).ok()),
            },
            "subscriptionsCreated" => {
                let body: SubscriptionsCreatedBody = serde_json::from_value(value)?;
                ServerFrame::SubscriptionsCreated {
                    subscriptions: body.subscriptions,
                    errors: body.errors,
                }
            }
            "topicUpdated" => ServerFrame::TopicUpdated {
                topic: text_field(&value, "topic"),
                version: int_field(&value, "version"),
            },
            "topicAdded" => ServerFrame::TopicAdded {
                topic: text_field(&value, "topic"),
            },
            "topicRemoved" => ServerFrame::TopicRemoved {
                topic: text_field(&value, "topic"),
            },
            _ => ServerFrame::Other,
        };
        Ok(frame)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
