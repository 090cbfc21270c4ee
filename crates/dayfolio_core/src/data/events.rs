//! Change notifications for UI observers.

use crate::model::EntityKind;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

/// Observable change emitted by the data manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataEvent {
    /// The cached collection of `kind` was replaced.
    Changed(EntityKind),
    /// A key-value commit succeeded; `pulse` is the new save-pulse value.
    Saved { pulse: u64 },
}

#[derive(Default)]
pub(crate) struct Subscribers {
    senders: Mutex<Vec<Sender<DataEvent>>>,
}

impl Subscribers {
    pub fn subscribe(&self) -> Receiver<DataEvent> {
        let (sender, receiver) = channel();
        self.senders
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(sender);
        receiver
    }

    /// Delivers `event` to every live receiver and prunes dropped ones.
    pub fn publish(&self, event: DataEvent) {
        self.senders
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .retain(|sender| sender.send(event).is_ok());
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.senders
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
