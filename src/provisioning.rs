use crate::error::ProvisionError;
use crate::protocol::OutboundMessage;

/// Validated Wi-Fi credentials ready to be sent to the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    ssid: String,
    pass: String,
}

impl ProvisionRequest {
    /// Validate credentials.
    ///
    /// An empty password means joining an open network; that only goes
    /// through when the caller passes `allow_open` after asking the user.
    pub fn new(
        ssid: impl Into<String>,
        pass: impl Into<String>,
        allow_open: bool,
    ) -> Result<Self, ProvisionError> {
        let ssid = ssid.into();
        let pass = pass.into();

        if ssid.trim().is_empty() {
            return Err(ProvisionError::MissingSsid);
        }

        if pass.is_empty() && !allow_open {
            return Err(ProvisionError::OpenNetworkNotConfirmed);
        }

        Ok(Self { ssid, pass })
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn is_open(&self) -> bool {
        self.pass.is_empty()
    }
}

impl From<ProvisionRequest> for OutboundMessage {
    fn from(request: ProvisionRequest) -> Self {
        OutboundMessage::Provision {
            ssid: request.ssid,
            pass: request.pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_ssid_is_rejected() {
        assert_eq!(
            ProvisionRequest::new("", "secret", false),
            Err(ProvisionError::MissingSsid)
        );
        assert_eq!(
            ProvisionRequest::new("   ", "secret", true),
            Err(ProvisionError::MissingSsid)
        );
    }

    #[test]
    fn test_open_network_requires_confirmation() {
        assert_eq!(
            ProvisionRequest::new("Cafe", "", false),
            Err(ProvisionError::OpenNetworkNotConfirmed)
        );

        let request = ProvisionRequest::new("Cafe", "", true).expect("confirmed open network");
        assert!(request.is_open());
    }

    #[test]
    fn test_request_converts_to_outbound_message() {
        let request = ProvisionRequest::new("Home", "secret", false).expect("valid request");

        assert_eq!(
            OutboundMessage::from(request),
            OutboundMessage::Provision {
                ssid: "Home".to_string(),
                pass: "secret".to_string(),
            }
        );
    }
}
