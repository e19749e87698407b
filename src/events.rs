use serde::Serialize;

use crate::protocol::{ProvisionAck, RequestType, ScanResult};

/// Events that can happen in the console
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum Event {
    WebSocket(WebSocketEvent),
    Device(DeviceEvent),
    Auth(AuthEvent),
    Ui(UiEvent),
}

/// Transport and request lifecycle
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum WebSocketEvent {
    Connected,
    Disconnected,
    /// A send was attempted while the transport was not open
    SendRejected,
    /// A request went out; the loading indicator is shown
    RequestStarted(RequestType),
    /// A request was answered; `pending` tells whether others are in flight
    RequestSettled { pending: bool },
    RequestTimedOut {
        request_type: RequestType,
        pending: bool,
    },
}

/// Replies and status pushes from the device
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    ScanResultsReceived(Vec<ScanResult>),
    ProvisionStarted { ssid: String },
    ProvisionAcknowledged(ProvisionAck),
    WifiConnectionChanged { connected: bool },
    SelectNetwork { ssid: String },
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    LoginStarted,
    LoginResponse(Result<(), String>),
    Logout,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ClearError,
    ClearSuccess,
}
