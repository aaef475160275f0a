use anyhow::{Context, Result, ensure};
use std::{env, sync::OnceLock, time::Duration};

/// Application configuration loaded and validated at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Admin service configuration
    pub ui: UiConfig,

    /// Device REST API configuration
    pub rame: RameConfig,
}

#[derive(Clone, Debug)]
pub struct UiConfig {
    pub port: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RameConfig {
    pub protocol: String,
    pub host: String,
    pub port: Option<u16>,
    pub base_path: String,
    pub timeout: Duration,
}

impl AppConfig {
    /// Get or load the application configuration
    ///
    /// On first call the configuration is loaded from environment variables,
    /// subsequent calls return the cached instance.
    ///
    /// # Panics
    /// Panics if configuration loading fails. The service cannot run without
    /// a valid configuration.
    pub fn get() -> &'static Self {
        static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();
        APP_CONFIG.get_or_init(|| {
            Self::load_internal().expect("failed to load application configuration")
        })
    }

    fn load_internal() -> Result<Self> {
        let ui = UiConfig::load()?;
        let rame = RameConfig::load()?;

        Ok(Self { ui, rame })
    }
}

impl UiConfig {
    fn load() -> Result<Self> {
        let port = env::var("UI_PORT")
            .unwrap_or_else(|_| "8081".to_string())
            .parse::<u16>()
            .context("failed to parse UI_PORT: invalid format")?;

        Ok(Self { port })
    }
}

impl RameConfig {
    fn load() -> Result<Self> {
        let protocol = env::var("RAME_PROTOCOL").unwrap_or_else(|_| "http".to_string());
        let host = env::var("RAME_HOST").unwrap_or_else(|_| "localhost".to_string());
        let base_path = env::var("RAME_BASE_PATH").unwrap_or_else(|_| "/".to_string());

        let port = match env::var("RAME_PORT") {
            Ok(port) if !port.is_empty() => Some(
                port.parse::<u16>()
                    .context("failed to parse RAME_PORT: invalid format")?,
            ),
            _ => None,
        };

        let timeout = env::var("RAME_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("failed to parse RAME_TIMEOUT_SECS: invalid format")?;

        ensure!(
            protocol == "http" || protocol == "https",
            "failed to load RAME_PROTOCOL: unsupported protocol {protocol}"
        );
        ensure!(!host.is_empty(), "failed to load RAME_HOST: empty host");

        Ok(Self {
            protocol,
            host,
            port,
            base_path,
            timeout: Duration::from_secs(timeout),
        })
    }

    /// Base URL of the device REST API, always ending with a single "/"
    pub fn base_url(&self) -> String {
        let mut url = format!("{}://{}", self.protocol, self.host);

        if let Some(port) = self.port {
            url.push_str(&format!(":{port}"));
        }

        let base_path = self.base_path.trim_matches('/');
        if !base_path.is_empty() {
            url.push('/');
            url.push_str(base_path);
        }
        url.push('/');

        url
    }
}
