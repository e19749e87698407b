use anyhow::{Context, Result, bail, ensure};
use std::{env, time::Duration};
use url::Url;

const DEFAULT_DEVICE_URL: &str = "http://192.168.4.1";
const DEFAULT_WS_PATH: &str = "/ws";
const DEFAULT_AUTH_PATH: &str = "/auth";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Console configuration loaded and validated at startup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Device endpoint configuration
    pub device: DeviceConfig,

    /// Request timing configuration
    pub request: RequestConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceConfig {
    pub base_url: Url,
    pub ws_path: String,
    pub auth_path: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestConfig {
    pub timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration using `lookup` to resolve variable names
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let device = DeviceConfig::load(&lookup)?;
        let request = RequestConfig::load(&lookup)?;

        Ok(Self { device, request })
    }

    /// Apply command line overrides on top of the loaded values
    pub fn with_overrides(
        mut self,
        device_url: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        if let Some(device_url) = device_url {
            self.device.base_url = parse_base_url(device_url)?;
        }

        if let Some(timeout_secs) = timeout_secs {
            self.request.timeout = parse_timeout(timeout_secs)?;
        }

        Ok(self)
    }
}

impl DeviceConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = parse_base_url(
            &lookup("DEVICE_URL").unwrap_or_else(|| DEFAULT_DEVICE_URL.to_string()),
        )?;
        let ws_path = lookup("WS_PATH").unwrap_or_else(|| DEFAULT_WS_PATH.to_string());
        let auth_path = lookup("AUTH_PATH").unwrap_or_else(|| DEFAULT_AUTH_PATH.to_string());

        Ok(Self {
            base_url,
            ws_path,
            auth_path,
        })
    }

    /// WebSocket URL of the control channel (`http` → `ws`, `https` → `wss`)
    pub fn ws_url(&self) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&self.ws_path)
            .context("failed to build websocket url")?;

        let scheme = match url.scheme() {
            "http" => "ws",
            "https" => "wss",
            other => bail!("unsupported device url scheme: {other}"),
        };

        if url.set_scheme(scheme).is_err() {
            bail!("failed to set websocket scheme on {url}");
        }

        Ok(url)
    }

    pub fn auth_url(&self) -> Result<Url> {
        self.base_url
            .join(&self.auth_path)
            .context("failed to build auth url")
    }
}

impl RequestConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .context("failed to parse REQUEST_TIMEOUT_SECS: invalid format")?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            timeout: parse_timeout(secs)?,
        })
    }
}

fn parse_base_url(value: &str) -> Result<Url> {
    let url = Url::parse(value).with_context(|| format!("failed to parse device url {value:?}"))?;

    ensure!(
        matches!(url.scheme(), "http" | "https"),
        "device url must use http or https: {value}"
    );

    Ok(url)
}

fn parse_timeout(secs: u64) -> Result<Duration> {
    ensure!(secs > 0, "request timeout must be greater than zero");
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).expect("default config");

        assert_eq!(config.device.base_url.as_str(), "http://192.168.4.1/");
        assert_eq!(config.request.timeout, Duration::from_secs(10));
        assert_eq!(
            config.device.ws_url().expect("ws url").as_str(),
            "ws://192.168.4.1/ws"
        );
        assert_eq!(
            config.device.auth_url().expect("auth url").as_str(),
            "http://192.168.4.1/auth"
        );
    }

    #[test]
    fn test_https_device_uses_wss() {
        let config = config_from(&[("DEVICE_URL", "https://device.local:8443")]).expect("config");

        assert_eq!(
            config.device.ws_url().expect("ws url").as_str(),
            "wss://device.local:8443/ws"
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(config_from(&[("DEVICE_URL", "not a url")]).is_err());
        assert!(config_from(&[("DEVICE_URL", "ftp://device")]).is_err());
        assert!(config_from(&[("DEVICE_URL", "ws://192.168.4.1")]).is_err());
        assert!(config_from(&[("REQUEST_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config_from(&[("REQUEST_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[])
            .expect("config")
            .with_overrides(Some("http://10.0.0.2:8080"), Some(3))
            .expect("overrides");

        assert_eq!(config.device.base_url.as_str(), "http://10.0.0.2:8080/");
        assert_eq!(config.request.timeout, Duration::from_secs(3));
    }
}
