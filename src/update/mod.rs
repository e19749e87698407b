mod auth;
mod device;
mod ui;
mod websocket;

use crate::events::Event;
use crate::model::Model;

pub const DISCONNECTED_MESSAGE: &str = "Disconnected from device. Reload to reconnect.";
pub const TIMEOUT_MESSAGE: &str = "Request timed out!";

/// Main update dispatcher - routes events to domain-specific handlers.
///
/// Returns `true` when the model changed and the view needs a refresh.
pub fn update(event: Event, model: &mut Model) -> bool {
    match event {
        Event::WebSocket(event) => websocket::handle(event, model),
        Event::Device(event) => device::handle(event, model),
        Event::Auth(event) => auth::handle(event, model),
        Event::Ui(event) => ui::handle(event, model),
    }
}
