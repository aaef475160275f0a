use log::debug;
use rameplayer_admin_core::ports::ConfigurationListener;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 16;

/// Broadcasts that a save attempt finished and the device notifications
/// should be reset
#[derive(Clone)]
pub struct AppliedSignal {
    tx: broadcast::Sender<()>,
}

impl AppliedSignal {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }
}

impl Default for AppliedSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationListener for AppliedSignal {
    fn configuration_applied(&self) {
        if self.tx.send(()).is_err() {
            debug!("configuration applied without subscribers");
        }
    }
}
