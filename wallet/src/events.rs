use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Notifications the store publishes to UI listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletEvent {
    /// Any open wallet modal should close.
    ModalsClosed,
    WalletConnected,
    WalletDisconnected,
}

/// Fan-out of [`WalletEvent`]s. Publishing with no subscribers is not an error.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<WalletEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: WalletEvent) {
        let delivered = self.sender.send(event).unwrap_or(0);
        log::debug!("Emitted {:?} to {} listener(s)", event, delivered);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
