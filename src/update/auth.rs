use log::debug;

use crate::events::AuthEvent;
use crate::model::Model;
use crate::update_field;

/// Handle authentication-related events
pub fn handle(event: AuthEvent, model: &mut Model) -> bool {
    match event {
        AuthEvent::LoginStarted => {
            model.start_loading();
            true
        }

        AuthEvent::LoginResponse(Ok(())) => {
            debug!("login succeeded");
            model.stop_loading();
            model.is_authenticated = true;
            true
        }

        AuthEvent::LoginResponse(Err(error)) => {
            model.is_authenticated = false;
            model.set_error(error);
            true
        }

        AuthEvent::Logout => update_field!(model.is_authenticated, false),
    }
}
