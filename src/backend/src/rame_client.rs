use crate::{
    config::{AppConfig, RameConfig},
    http_client::{handle_http_response, rest_client},
};
use anyhow::{Context, Result, anyhow};
use log::info;
use rameplayer_admin_core::{
    PersistedSettings, SettingsDraft, SystemSettings,
    ports::{ServerInfo, SettingsGateway},
};
use reqwest::Client;
use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::{fmt::Debug, sync::OnceLock};

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct VersionInfo {
    pub required: String,
    pub current: String,
    pub mismatch: bool,
}

#[derive(Deserialize)]
struct ServerVersion {
    server: String,
}

/// REST client of the rameplayer device server
#[derive(Clone)]
pub struct RameClient {
    client: Client,
    base_url: String,
}

impl RameClient {
    const REQUIRED_SERVER_VERSION: &str = ">=0.5.0";

    // API endpoint constants
    const SYSTEM_SETTINGS_ENDPOINT: &str = "settings/system/";
    const VERSION_ENDPOINT: &str = "version";

    pub fn new() -> Result<Self> {
        Self::with_config(&AppConfig::get().rame)
    }

    pub fn with_config(config: &RameConfig) -> Result<Self> {
        let client = rest_client(config.timeout)?;

        Ok(RameClient {
            client,
            base_url: config.base_url(),
        })
    }

    fn required_version() -> &'static VersionReq {
        static REQUIRED_VERSION: OnceLock<VersionReq> = OnceLock::new();
        REQUIRED_VERSION.get_or_init(|| {
            VersionReq::parse(Self::REQUIRED_SERVER_VERSION)
                .expect("invalid REQUIRED_SERVER_VERSION constant")
        })
    }

    /// Compare a reported server version with the supported range
    pub fn version_info(current: &str) -> Result<VersionInfo> {
        let parsed_current = Version::parse(current)
            .map_err(|e| anyhow!("failed to parse server version: {e}"))?;

        Ok(VersionInfo {
            required: Self::REQUIRED_SERVER_VERSION.to_string(),
            current: current.to_string(),
            mismatch: !Self::required_version().matches(&parsed_current),
        })
    }

    fn build_url(&self, path: &str) -> String {
        let normalized_path = path.trim_start_matches('/');
        format!("{}{normalized_path}", self.base_url)
    }

    /// GET request to the device REST API
    async fn get(&self, path: &str) -> Result<String> {
        let url = self.build_url(path);
        info!("GET {url}");

        let res = self
            .client
            .get(&url)
            .send()
            .await
            .context(format!("failed to send GET request to {url}"))?;

        handle_http_response(res, &format!("GET {url}")).await
    }

    /// POST request to the device REST API with JSON body
    async fn post_json(&self, path: &str, body: impl Debug + Serialize) -> Result<String> {
        let url = self.build_url(path);
        info!("POST {url} with body: {body:?}");

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context(format!("failed to send POST request to {url}"))?;

        handle_http_response(res, &format!("POST {url}")).await
    }
}

impl SettingsGateway for RameClient {
    async fn fetch_settings(&self) -> Result<SettingsDraft> {
        let body = self.get(Self::SYSTEM_SETTINGS_ENDPOINT).await?;
        let settings: SystemSettings =
            serde_json::from_str(&body).context("failed to parse system settings")?;

        Ok(SettingsDraft::from(&settings))
    }

    async fn persist_settings(&self, record: PersistedSettings) -> Result<()> {
        record
            .validate()
            .map_err(|e| anyhow!("failed to validate settings record: {e}"))?;

        self.post_json(Self::SYSTEM_SETTINGS_ENDPOINT, record)
            .await?;
        Ok(())
    }
}

impl ServerInfo for RameClient {
    async fn server_version(&self) -> Result<String> {
        let body = self.get(Self::VERSION_ENDPOINT).await?;
        let version: ServerVersion =
            serde_json::from_str(&body).context("failed to parse server version")?;

        Ok(version.server)
    }
}
