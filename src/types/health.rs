//! Portal health payload

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of the Portal health endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalHealth {
    /// Overall status, usually `ok`
    pub status: String,
    /// Service name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Server time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Deployment environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    /// Unrecognized fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
