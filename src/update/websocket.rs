use log::warn;

use crate::events::WebSocketEvent;
use crate::model::Model;
use crate::update::{DISCONNECTED_MESSAGE, TIMEOUT_MESSAGE};
use crate::update_field;

/// Handle transport and request lifecycle events
pub fn handle(event: WebSocketEvent, model: &mut Model) -> bool {
    match event {
        WebSocketEvent::Connected => update_field!(model.transport_open, true),

        WebSocketEvent::Disconnected => update_field!(
            model.transport_open, false;
            model.is_loading, false
        ),

        WebSocketEvent::SendRejected => {
            model.set_error(DISCONNECTED_MESSAGE.to_string());
            true
        }

        WebSocketEvent::RequestStarted(_) => {
            model.start_loading();
            true
        }

        WebSocketEvent::RequestSettled { pending } => update_field!(model.is_loading, pending),

        WebSocketEvent::RequestTimedOut {
            request_type,
            pending,
        } => {
            warn!("{request_type} request timed out");
            update_field!(
                model.is_loading, pending;
                model.error_message, Some(TIMEOUT_MESSAGE.to_string())
            )
        }
    }
}
