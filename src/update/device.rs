use log::{debug, info};

use crate::events::DeviceEvent;
use crate::model::{Model, ProvisioningState};
use crate::update_field;

/// Handle device replies and status pushes
pub fn handle(event: DeviceEvent, model: &mut Model) -> bool {
    match event {
        DeviceEvent::ScanResultsReceived(networks) => {
            debug!("scan returned {} networks", networks.len());
            update_field!(model.networks, networks)
        }

        DeviceEvent::ProvisionStarted { ssid } => {
            update_field!(model.provisioning, ProvisioningState::Pending { ssid })
        }

        DeviceEvent::ProvisionAcknowledged(ack) => {
            match (ack.success, &ack.message) {
                (Some(false), message) => {
                    model.success_message = None;
                    model.error_message = Some(
                        message
                            .clone()
                            .unwrap_or_else(|| "Connection failed. Check credentials.".to_string()),
                    );
                }
                (_, message) => {
                    model.error_message = None;
                    model.success_message = Some(
                        message
                            .clone()
                            .unwrap_or_else(|| "Provisioning accepted.".to_string()),
                    );
                }
            }
            model.provisioning = ProvisioningState::Acknowledged(ack);
            true
        }

        DeviceEvent::WifiConnectionChanged { connected } => {
            info!("device wifi connected: {connected}");
            update_field!(model.wifi_connected, Some(connected))
        }

        DeviceEvent::SelectNetwork { ssid } => update_field!(model.selected_ssid, Some(ssid)),
    }
}
