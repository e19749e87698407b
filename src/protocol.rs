//! Wire format of the device control channel.
//!
//! Outbound frames are JSON objects tagged by `type` and carry the request id
//! generated by the session. Inbound frames are tagged the same way; the `id`
//! is optional because older firmware does not echo it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Identifier embedded in every outbound message and echoed in the reply
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of request that expects a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Scan,
    Provision,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Scan => "scan",
            RequestType::Provision => "provision",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Messages the console sends to the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    #[serde(rename = "scan")]
    Scan,
    #[serde(rename = "prvsn")]
    Provision { ssid: String, pass: String },
}

impl OutboundMessage {
    pub fn request_type(&self) -> RequestType {
        match self {
            OutboundMessage::Scan => RequestType::Scan,
            OutboundMessage::Provision { .. } => RequestType::Provision,
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    id: &'a RequestId,
    #[serde(flatten)]
    message: &'a OutboundMessage,
}

/// Serialize `message` with its request id into a text frame
pub fn encode(id: &RequestId, message: &OutboundMessage) -> serde_json::Result<String> {
    serde_json::to_string(&Envelope { id, message })
}

/// One network reported by a device scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub ssid: String,
    pub rssi: i32,
    pub open: bool,
}

/// Acknowledgment of a provisioning request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionAck {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct ScanPayload {
    networks: Vec<ScanResult>,
}

#[derive(Deserialize)]
struct WifiConnPayload {
    connected: bool,
}

/// Typed outcome of dispatching one inbound frame by its `type` tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    ScanResults(Vec<ScanResult>),
    ProvisionAck(ProvisionAck),
    ConnectionStatus { connected: bool },
    Unrecognized(String),
}

impl Dispatch {
    /// Request kind a reply of this shape answers, if any
    pub fn answers(&self) -> Option<RequestType> {
        match self {
            Dispatch::ScanResults(_) => Some(RequestType::Scan),
            Dispatch::ProvisionAck(_) => Some(RequestType::Provision),
            Dispatch::ConnectionStatus { .. } | Dispatch::Unrecognized(_) => None,
        }
    }
}

/// A decoded inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub id: Option<RequestId>,
    pub dispatch: Dispatch,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid json: {0}")]
    InvalidJson(String),
    #[error("payload is not a json object")]
    NotAnObject,
    #[error("payload has no string `type` field")]
    MissingType,
    #[error("malformed `{kind}` payload: {reason}")]
    InvalidBody { kind: String, reason: String },
}

/// Parse one inbound text frame.
///
/// Unknown `type` values are not an error: they decode to
/// [`Dispatch::Unrecognized`] so the caller can log and ignore them.
pub fn decode(text: &str) -> Result<Inbound, DecodeError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;

    let Value::Object(object) = &value else {
        return Err(DecodeError::NotAnObject);
    };

    let Some(kind) = object.get("type").and_then(Value::as_str) else {
        return Err(DecodeError::MissingType);
    };

    let id = object
        .get("id")
        .and_then(Value::as_str)
        .map(RequestId::from);

    let invalid = |e: serde_json::Error| DecodeError::InvalidBody {
        kind: kind.to_string(),
        reason: e.to_string(),
    };

    let dispatch = match kind {
        "scan" => {
            let payload: ScanPayload = serde_json::from_value(value.clone()).map_err(invalid)?;
            Dispatch::ScanResults(payload.networks)
        }
        "provsn" => Dispatch::ProvisionAck(serde_json::from_value(value.clone()).map_err(invalid)?),
        "wifi_conn" => {
            let payload: WifiConnPayload =
                serde_json::from_value(value.clone()).map_err(invalid)?;
            Dispatch::ConnectionStatus {
                connected: payload.connected,
            }
        }
        other => Dispatch::Unrecognized(other.to_string()),
    };

    Ok(Inbound { id, dispatch })
}
