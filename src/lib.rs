pub mod auth;
pub mod config;
pub mod correlator;
pub mod error;
pub mod events;
pub mod macros;
pub mod model;
pub mod protocol;
pub mod provisioning;
pub mod scan_list;
pub mod session;
pub mod signal;
pub mod transport;
pub mod update;

// Re-export core types
pub use crate::{
    auth::{AuthClient, AuthOutcome},
    config::AppConfig,
    error::{ProvisionError, SessionError},
    events::Event,
    model::Model,
    protocol::{Dispatch, OutboundMessage, RequestId, RequestType, ScanResult},
    provisioning::ProvisionRequest,
    scan_list::{ScanListEntry, render_scan_list},
    session::{Session, SessionEvent},
    signal::{SignalClass, calculate_width},
    transport::{Transport, WsTransport},
};
