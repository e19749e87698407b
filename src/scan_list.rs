use crate::protocol::ScanResult;
use crate::signal::{SignalClass, calculate_width, width_percent};
use std::fmt;

const BAR_CELLS: usize = 20;
const LOCK: &str = "\u{1F512}";

/// One rendered row of the scan list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanListEntry {
    pub label: String,
    pub locked: bool,
    pub signal: SignalClass,
    pub width: String,
    filled: usize,
}

impl ScanListEntry {
    pub fn new(network: &ScanResult) -> Self {
        let filled = (width_percent(network.rssi) * BAR_CELLS as f64 / 100.0).round() as usize;

        Self {
            label: network.ssid.clone(),
            locked: !network.open,
            signal: SignalClass::from_rssi(network.rssi),
            width: calculate_width(network.rssi),
            filled,
        }
    }
}

impl fmt::Display for ScanListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lock = if self.locked { LOCK } else { " " };
        let bar = format!(
            "{}{}",
            "#".repeat(self.filled),
            "-".repeat(BAR_CELLS - self.filled)
        );

        write!(
            f,
            "{:<32} {lock} [{bar}] {:>7} {}",
            self.label, self.width, self.signal
        )
    }
}

/// Rows for `networks`, keeping the order the device reported
pub fn render_scan_list(networks: &[ScanResult]) -> Vec<ScanListEntry> {
    networks.iter().map(ScanListEntry::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Dispatch, decode};

    #[test]
    fn test_scan_reply_renders_single_locked_strong_entry() {
        let inbound =
            decode(r#"{"type":"scan","networks":[{"ssid":"Home","rssi":-55,"open":false}]}"#)
                .expect("decode");
        let Dispatch::ScanResults(networks) = inbound.dispatch else {
            panic!("expected scan results");
        };

        let entries = render_scan_list(&networks);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "Home");
        assert!(entries[0].locked);
        assert_eq!(entries[0].signal.as_str(), "strong");
        assert_eq!(entries[0].width, "75%");
    }

    #[test]
    fn test_open_network_has_no_lock() {
        let entries = render_scan_list(&[ScanResult {
            ssid: "Cafe".to_string(),
            rssi: -85,
            open: true,
        }]);

        assert!(!entries[0].locked);
        assert_eq!(entries[0].signal, SignalClass::Weak);
        assert!(!entries[0].to_string().contains(LOCK));
    }

    #[test]
    fn test_render_keeps_device_order() {
        let networks = vec![
            ScanResult {
                ssid: "b".to_string(),
                rssi: -90,
                open: true,
            },
            ScanResult {
                ssid: "a".to_string(),
                rssi: -40,
                open: false,
            },
        ];

        let labels: Vec<_> = render_scan_list(&networks)
            .into_iter()
            .map(|entry| entry.label)
            .collect();

        assert_eq!(labels, vec!["b", "a"]);
    }

    #[test]
    fn test_display_bar_is_fixed_width() {
        let entry = ScanListEntry::new(&ScanResult {
            ssid: "Home".to_string(),
            rssi: -70,
            open: false,
        });
        let line = entry.to_string();

        assert!(line.contains("[##########----------]"));
        assert!(line.ends_with("moderate"));
    }
}
