//! JSON messages exchanged with the host page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::explain::{ExplanationRequest, RemoteReply};
use crate::view::RoundView;

/// Host → game.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    /// Whether the host can reach a remote explanation backend.
    Explainer { online: bool },
    /// Answer to an earlier `explain` request.
    Explanation(RemoteReply),
}

impl HostMessage {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

/// Game → host.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameMessage<'a> {
    View(RoundView<'a>),
    Explain(ExplanationRequest),
}
