//! Event fan-out owned by the facade.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::trace;
use tvplay_core::FacadeEvent;

/// Publishes facade events to every live subscriber.
///
/// Subscribers whose receiver was dropped are pruned on the next publish.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<Sender<FacadeEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> Receiver<FacadeEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    pub fn publish(&self, event: &FacadeEvent) {
        trace!("Publishing {event:?}");
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tvplay_core::PlayerState;

    #[test]
    fn test_fan_out() {
        let bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        bus.publish(&FacadeEvent::StateChanged(PlayerState::Ready));

        assert_eq!(a.try_recv().ok(), Some(FacadeEvent::StateChanged(PlayerState::Ready)));
        assert_eq!(b.try_recv().ok(), Some(FacadeEvent::StateChanged(PlayerState::Ready)));
    }

    #[test]
    fn test_prunes_dropped_subscribers() {
        let bus = EventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());
        bus.publish(&FacadeEvent::StateChanged(PlayerState::Idle));

        assert_eq!(bus.subscriber_count(), 1);
        assert!(kept.try_recv().is_ok());
    }
}
