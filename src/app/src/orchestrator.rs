use anyhow::{Context, Result};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::{
    ports::{ConfigurationListener, Feedback, SettingsGateway},
    types::{PersistedSettings, SettingsDraft},
    validation::{validate, FieldTag},
};

/// Success message reported after the device accepted the settings
pub const SAVE_SUCCESS_MESSAGE: &str = "Admin settings saved.";

/// State machine of the settings save workflow
///
/// ```text
/// Idle ──submit──▶ Validating ──failures──▶ Rejected
///                      │
///                      └──valid──▶ Persisting ──▶ Persisted | Failed
/// ```
///
/// `Rejected`, `Persisted` and `Failed` are interactive states: the next
/// submit starts over at `Validating`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum SaveState {
    #[default]
    Idle,
    Validating,
    Rejected {
        fields: Vec<FieldTag>,
    },
    Persisting,
    Persisted,
    Failed {
        diagnostic: String,
    },
}

impl SaveState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Validating | Self::Persisting)
    }
}

/// Result of a single submit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum SaveOutcome {
    /// Validation failed, nothing was sent to the device
    Rejected { fields: Vec<FieldTag> },
    Persisted,
    /// The device store returned an error
    Failed { diagnostic: String },
}

/// Diagnostic recorded when a save is abandoned while the device call is running
pub const SAVE_INTERRUPTED: &str = "save interrupted before the device answered";

/// Running gateway call of a submit
///
/// Dropping it notifies the listener, whichever way the save attempt ended. A
/// save that is still `Persisting` at that point was abandoned and ends as
/// `Failed`.
struct SaveAttempt<'a, Listener: ConfigurationListener> {
    state: &'a mut SaveState,
    listener: &'a Listener,
}

impl<Listener: ConfigurationListener> Drop for SaveAttempt<'_, Listener> {
    fn drop(&mut self) {
        if *self.state == SaveState::Persisting {
            *self.state = SaveState::Failed {
                diagnostic: SAVE_INTERRUPTED.to_string(),
            };
        }
        self.listener.configuration_applied();
    }
}

/// Coordinates validation, record translation and the remote save
pub struct SaveOrchestrator<Gateway, Reporter, Listener>
where
    Gateway: SettingsGateway,
    Reporter: Feedback,
    Listener: ConfigurationListener,
{
    gateway: Gateway,
    feedback: Reporter,
    listener: Listener,
    state: SaveState,
}

impl<Gateway, Reporter, Listener> SaveOrchestrator<Gateway, Reporter, Listener>
where
    Gateway: SettingsGateway,
    Reporter: Feedback,
    Listener: ConfigurationListener,
{
    pub fn new(gateway: Gateway, feedback: Reporter, listener: Listener) -> Self {
        Self {
            gateway,
            feedback,
            listener,
            state: SaveState::Idle,
        }
    }

    pub fn state(&self) -> &SaveState {
        &self.state
    }

    pub fn feedback(&self) -> &Reporter {
        &self.feedback
    }

    /// Fetch the current device settings as a fresh draft
    pub async fn load(&self) -> Result<SettingsDraft> {
        self.gateway
            .fetch_settings()
            .await
            .context("failed to fetch settings")
    }

    /// Validate and persist a snapshot of the draft
    ///
    /// The draft is taken by value: edits made to the caller's copy while the
    /// save is in flight are not sent. Taking `&mut self` rules out a second
    /// submit on the same orchestrator before this one finished.
    pub async fn submit(&mut self, draft: SettingsDraft) -> SaveOutcome {
        self.state = SaveState::Validating;

        let fields = validate(&draft);
        if !fields.is_empty() {
            info!("settings rejected: {fields:?}");
            self.feedback.validation_failed(&fields);
            self.state = SaveState::Rejected {
                fields: fields.clone(),
            };
            return SaveOutcome::Rejected { fields };
        }

        let record = PersistedSettings::from_draft(&draft);
        info!("save settings: {record:?}");

        let attempt = SaveAttempt {
            state: &mut self.state,
            listener: &self.listener,
        };
        *attempt.state = SaveState::Persisting;

        match self.gateway.persist_settings(record).await {
            Ok(()) => {
                debug!("save settings succeeded");
                *attempt.state = SaveState::Persisted;
                self.feedback.saved(SAVE_SUCCESS_MESSAGE);
                SaveOutcome::Persisted
            }
            Err(e) => {
                error!("save settings failed: {e:#}");
                let diagnostic = format!("{e:#}");
                *attempt.state = SaveState::Failed {
                    diagnostic: diagnostic.clone(),
                };
                self.feedback.persist_failed(&e);
                SaveOutcome::Failed { diagnostic }
            }
        }
    }
}
