use serde::{Deserialize, Serialize};

/// A structured log statement from the window manager's log stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMessage {
    pub text: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub level: String,
    /// Source location the statement was logged at.
    #[serde(default)]
    pub at: String,
}
