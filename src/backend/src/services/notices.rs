//! Notice board backing the admin console's toast area

use anyhow::Error;
use log::debug;
use rameplayer_admin_core::{FieldTag, ports::Feedback};
use serde::Serialize;
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

/// Lifetime of notices that dismiss themselves
pub const AUTO_DISMISS_AFTER: Duration = Duration::from_secs(5);

pub const INVALID_SETTINGS: &str = "INVALID_SETTINGS";
pub const CHECK_INSERTED_VALUES: &str = "CHECK_INSERTED_VALUES";
pub const ADMIN_SETTINGS_NOT_SAVED: &str = "ADMIN_SETTINGS_NOT_SAVED";
pub const SAVED_TITLE: &str = "Saved";
pub const SAVE_FAILED_TITLE: &str = "Saving failed";
pub const SAVE_FAILED_MESSAGE: &str = "Saving admin settings failed.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
    /// Sticky notices stay until they are dismissed
    pub sticky: bool,
    #[serde(skip)]
    created: Instant,
}

impl Notice {
    fn new(level: NoticeLevel, title: &str, message: &str, sticky: bool) -> Self {
        Self {
            level,
            title: title.to_string(),
            message: message.to_string(),
            sticky,
            created: Instant::now(),
        }
    }

    fn expired(&self, now: Instant) -> bool {
        !self.sticky && now.duration_since(self.created) >= AUTO_DISMISS_AFTER
    }
}

/// Shared list of currently displayed notices
#[derive(Clone, Default)]
pub struct NoticeBoard {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl NoticeBoard {
    fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, notice: Notice) {
        debug!("notice: {}: {}", notice.title, notice.message);
        self.lock().push(notice);
    }

    /// Notices still on display, oldest first
    pub fn current(&self) -> Vec<Notice> {
        let now = Instant::now();
        let mut notices = self.lock();
        notices.retain(|notice| !notice.expired(now));
        notices.clone()
    }

    /// Remove every notice
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Close sticky notices, auto-dismissing ones expire on their own
    pub fn dismiss_sticky(&self) {
        self.lock().retain(|notice| !notice.sticky);
    }
}

impl Feedback for NoticeBoard {
    fn validation_failed(&self, fields: &[FieldTag]) {
        let message = fields
            .iter()
            .map(FieldTag::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        self.push(Notice::new(
            NoticeLevel::Error,
            INVALID_SETTINGS,
            &message,
            true,
        ));
        self.push(Notice::new(
            NoticeLevel::Error,
            CHECK_INSERTED_VALUES,
            ADMIN_SETTINGS_NOT_SAVED,
            false,
        ));
    }

    fn saved(&self, message: &str) {
        self.clear();
        self.push(Notice::new(
            NoticeLevel::Success,
            SAVED_TITLE,
            message,
            false,
        ));
    }

    fn persist_failed(&self, error: &Error) {
        debug!("persist failed notice for: {error:#}");
        self.clear();
        self.push(Notice::new(
            NoticeLevel::Error,
            SAVE_FAILED_TITLE,
            SAVE_FAILED_MESSAGE,
            true,
        ));
    }
}
