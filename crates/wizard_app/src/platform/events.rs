use std::sync::mpsc;
use std::thread;

use wizard_core::{Msg, TrackerEvent};
use wizard_logging::wizard_debug;

/// Fans tracker changes out to every subscriber.
///
/// Subscribers whose receiving end is gone are dropped on the next publish.
#[derive(Default)]
pub struct TrackerEventBus {
    subscribers: Vec<mpsc::Sender<TrackerEvent>>,
}

impl TrackerEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<TrackerEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, event: TrackerEvent) {
        wizard_debug!("Tracker event: {:?}", event);
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Re-fetches the dataset list after every tracker change.
pub fn spawn_sidebar_subscriber<F>(events: mpsc::Receiver<TrackerEvent>, mut deliver: F)
where
    F: FnMut(Msg) -> bool + Send + 'static,
{
    thread::spawn(move || {
        while events.recv().is_ok() {
            if !deliver(Msg::DatasetsRefreshRequested) {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wizard_core::{update, AppState, Effect};

    use super::*;

    #[test]
    fn every_subscriber_sees_each_event() {
        let mut bus = TrackerEventBus::new();
        let first = bus.subscribe();
        let second = bus.subscribe();

        bus.publish(TrackerEvent::Reset);
        assert_eq!(first.try_recv(), Ok(TrackerEvent::Reset));
        assert_eq!(second.try_recv(), Ok(TrackerEvent::Reset));
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut bus = TrackerEventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());

        bus.publish(TrackerEvent::Reset);
        assert_eq!(bus.subscriber_count(), 1);
        assert!(kept.try_recv().is_ok());
    }

    #[test]
    fn sidebar_refreshes_on_tracker_change() {
        let mut bus = TrackerEventBus::new();
        let (msg_tx, msg_rx) = mpsc::channel();
        spawn_sidebar_subscriber(bus.subscribe(), move |msg| msg_tx.send(msg).is_ok());

        bus.publish(TrackerEvent::StageRecorded {
            stage: "filter".into(),
            artifact_id: "a2".into(),
        });
        assert_eq!(
            msg_rx.recv_timeout(Duration::from_secs(1)),
            Ok(Msg::DatasetsRefreshRequested)
        );
    }

    #[test]
    fn dataset_switch_refreshes_sidebar_once() {
        let mut bus = TrackerEventBus::new();
        let (msg_tx, msg_rx) = mpsc::channel();
        spawn_sidebar_subscriber(bus.subscribe(), move |msg| msg_tx.send(msg).is_ok());

        let (_, effects) = update(AppState::new(), Msg::DatasetSelected("b7".into()));
        for effect in effects {
            if let Effect::Publish(event) = effect {
                bus.publish(event);
            }
        }

        assert_eq!(
            msg_rx.recv_timeout(Duration::from_secs(1)),
            Ok(Msg::DatasetsRefreshRequested)
        );
        assert!(msg_rx.recv_timeout(Duration::from_millis(200)).is_err());
    }
}
