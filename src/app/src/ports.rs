//! Collaborators of the save workflow
//!
//! The orchestrator only talks to these traits; the admin service provides
//! the REST gateway and the notice board, tests provide mocks.

use anyhow::Result;
#[cfg(any(test, feature = "mock"))]
use mockall::automock;
use std::sync::Arc;
use trait_variant::make;

use crate::{
    types::{PersistedSettings, SettingsDraft},
    validation::FieldTag,
};

/// Remote settings store of the device
#[make(Send)]
#[cfg_attr(any(test, feature = "mock"), automock)]
pub trait SettingsGateway {
    /// Current device settings, already translated into an editable draft
    async fn fetch_settings(&self) -> Result<SettingsDraft>;
    async fn persist_settings(&self, record: PersistedSettings) -> Result<()>;
}

/// Shared gateway, so reads do not have to go through the save workflow
impl<Gateway> SettingsGateway for Arc<Gateway>
where
    Gateway: SettingsGateway + Send + Sync,
{
    async fn fetch_settings(&self) -> Result<SettingsDraft> {
        self.as_ref().fetch_settings().await
    }

    async fn persist_settings(&self, record: PersistedSettings) -> Result<()> {
        self.as_ref().persist_settings(record).await
    }
}

/// User-facing reporting surface
#[cfg_attr(any(test, feature = "mock"), automock)]
pub trait Feedback {
    /// Sticky report naming every invalid field in evaluation order
    fn validation_failed(&self, fields: &[FieldTag]);
    /// Auto-dismissing success report
    fn saved(&self, message: &str);
    /// Sticky report of a failed save
    fn persist_failed(&self, error: &anyhow::Error);
}

/// Downstream observer of applied configurations
#[cfg_attr(any(test, feature = "mock"), automock)]
pub trait ConfigurationListener {
    /// Clear pending device notifications after a save attempt completed
    fn configuration_applied(&self);
}

/// Version information of the device REST server
#[make(Send)]
#[cfg_attr(any(test, feature = "mock"), automock)]
pub trait ServerInfo {
    async fn server_version(&self) -> Result<String>;
}
