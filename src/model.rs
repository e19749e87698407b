use serde::Serialize;

use crate::protocol::{ProvisionAck, ScanResult};

/// Progress of the last provisioning attempt
#[derive(Debug, Default, Serialize, Clone, PartialEq, Eq)]
pub enum ProvisioningState {
    #[default]
    Idle,
    Pending {
        ssid: String,
    },
    Acknowledged(ProvisionAck),
}

/// Console Model - the complete UI state
#[derive(Debug, Default, Serialize, Clone, PartialEq, Eq)]
pub struct Model {
    // Device state
    pub networks: Vec<ScanResult>,
    pub wifi_connected: Option<bool>,
    pub provisioning: ProvisioningState,

    // Authentication state
    pub is_authenticated: bool,

    // UI state
    pub is_loading: bool,
    pub selected_ssid: Option<String>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,

    // WebSocket state
    pub transport_open: bool,
}

impl Model {
    /// Start a loading operation (sets is_loading=true, clears error)
    pub fn start_loading(&mut self) {
        self.is_loading = true;
        self.error_message = None;
    }

    /// Stop loading and clear error
    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.error_message = None;
    }

    /// Set an error message and stop loading
    pub fn set_error(&mut self, error: String) {
        self.is_loading = false;
        self.error_message = Some(error);
    }
}
