use tokio::sync::broadcast;

use crate::dto::events::SessionNotification;

/// Receiver side of session notifications. Implemented by the presentation layer.
pub trait SessionObserver: Send + Sync {
    /// Called once per notification, after the change was persisted.
    fn notify(&self, event: &SessionNotification);
}

impl<F> SessionObserver for F
where
    F: Fn(&SessionNotification) + Send + Sync,
{
    fn notify(&self, event: &SessionNotification) {
        self(event)
    }
}

/// Broadcast hub fanning session notifications out to any number of subscribers.
pub struct SessionHub {
    sender: broadcast::Sender<SessionNotification>,
}

impl SessionHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionNotification> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, event: SessionNotification) {
        let _ = self.sender.send(event);
    }
}

impl SessionObserver for SessionHub {
    fn notify(&self, event: &SessionNotification) {
        self.broadcast(event.clone());
    }
}
