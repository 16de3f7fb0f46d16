//! Holds the last decoded tag and tells the display surfaces about it

use std::{cell::RefCell, sync::Arc};

use parking_lot::ReentrantMutex;
use tracing::debug;

#[uniffi::export(callback_interface)]
pub trait TagStateObserver: Send + Sync + std::fmt::Debug + 'static {
    /// Called with the display string on every publish, and once on subscribe if a value exists
    fn on_tag_data(&self, data: String);
}

/// Handle returned from [`TagState::subscribe`], used to detach again
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, derive_more::Display, uniffi::Record)]
#[display("subscription #{id}")]
pub struct TagSubscription {
    pub id: u64,
}

#[derive(Debug, Default)]
struct Slot {
    value: Option<String>,
    /// bumped on every publish
    version: u64,
    next_id: u64,
    observers: Vec<(TagSubscription, Arc<dyn TagStateObserver>)>,
}

impl Slot {
    fn is_subscribed(&self, subscription: TagSubscription) -> bool {
        self.observers.iter().any(|(existing, _)| *existing == subscription)
    }
}

/// Single value, last write wins, new subscribers get the current value replayed
///
/// Observers are called while the slot lock is held, so once `unsubscribe` returns the observer
/// will not be called again. The lock is re-entrant, observers can call back into the state.
#[derive(Debug, uniffi::Object)]
pub struct TagState(ReentrantMutex<RefCell<Slot>>);

impl Default for TagState {
    fn default() -> Self {
        Self::new()
    }
}

#[uniffi::export]
impl TagState {
    #[uniffi::constructor]
    pub fn new() -> Self {
        Self(ReentrantMutex::new(RefCell::new(Slot::default())))
    }

    /// Overwrite the value and notify every observer, in the order they subscribed
    #[uniffi::method]
    pub fn publish(&self, value: String) {
        let slot = self.0.lock();

        let (version, observers) = {
            let mut slot = slot.borrow_mut();
            slot.value = Some(value.clone());
            slot.version += 1;
            (slot.version, slot.observers.clone())
        };

        debug!("publishing tag data to {} observers", observers.len());

        for (subscription, observer) in observers {
            {
                let slot = slot.borrow();

                // a newer value was published from a callback and already reached everyone
                if slot.version != version {
                    break;
                }

                // detached by an earlier observer
                if !slot.is_subscribed(subscription) {
                    continue;
                }
            }

            observer.on_tag_data(value.clone());
        }
    }

    #[uniffi::method]
    pub fn subscribe(&self, observer: Box<dyn TagStateObserver>) -> TagSubscription {
        let observer: Arc<dyn TagStateObserver> = Arc::from(observer);
        let slot = self.0.lock();

        let (subscription, current) = {
            let mut slot = slot.borrow_mut();
            let subscription = TagSubscription { id: slot.next_id };
            slot.next_id += 1;
            slot.observers.push((subscription, observer.clone()));

            (subscription, slot.value.clone())
        };

        debug!("{subscription} attached");
        if let Some(current) = current {
            observer.on_tag_data(current);
        }

        subscription
    }

    /// Detach an observer, unknown or already detached subscriptions are ignored
    #[uniffi::method]
    pub fn unsubscribe(&self, subscription: TagSubscription) {
        let slot = self.0.lock();
        let mut slot = slot.borrow_mut();

        let before = slot.observers.len();
        slot.observers.retain(|(existing, _)| *existing != subscription);

        if slot.observers.len() != before {
            debug!("{subscription} detached");
        }
    }

    #[uniffi::method]
    pub fn current(&self) -> Option<String> {
        self.0.lock().borrow().value.clone()
    }

    #[uniffi::method]
    pub fn subscriber_count(&self) -> u32 {
        let count = self.0.lock().borrow().observers.len();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Barrier, thread};

    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::RecordingObserver;

    #[test]
    fn starts_empty() {
        let state = TagState::new();
        assert_eq!(state.current(), None);
        assert_eq!(state.subscriber_count(), 0);
    }

    #[test]
    fn subscribe_before_publish_gets_nothing_until_publish() {
        let state = TagState::new();
        let observer = RecordingObserver::default();

        state.subscribe(Box::new(observer.clone()));
        assert!(observer.values().is_empty());

        state.publish("ID: 1 , command: a".into());
        assert_eq!(observer.values(), vec!["ID: 1 , command: a"]);
    }

    #[test]
    fn subscribe_after_publish_replays_latest_once() {
        let state = TagState::new();
        state.publish("first".into());
        state.publish("second".into());

        let observer = RecordingObserver::default();
        state.subscribe(Box::new(observer.clone()));

        assert_eq!(observer.values(), vec!["second"]);
        assert_eq!(state.current().as_deref(), Some("second"));
    }

    #[test]
    fn observers_are_notified_in_attachment_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let state = TagState::new();

        #[derive(Debug)]
        struct Named(&'static str, Arc<Mutex<Vec<&'static str>>>);
        impl TagStateObserver for Named {
            fn on_tag_data(&self, _data: String) {
                self.1.lock().push(self.0);
            }
        }

        state.subscribe(Box::new(Named("first", order.clone())));
        state.subscribe(Box::new(Named("second", order.clone())));
        state.subscribe(Box::new(Named("third", order.clone())));
        state.publish("value".into());

        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribe_stops_notifications_and_is_idempotent() {
        let state = TagState::new();
        let observer = RecordingObserver::default();

        let subscription = state.subscribe(Box::new(observer.clone()));
        state.publish("one".into());
        state.unsubscribe(subscription);
        state.unsubscribe(subscription);
        state.publish("two".into());

        assert_eq!(observer.values(), vec!["one"]);
        assert_eq!(state.subscriber_count(), 0);
    }

    #[test]
    fn subscriber_count_follows_attach_and_detach() {
        let state = TagState::new();
        let first = state.subscribe(Box::new(RecordingObserver::default()));
        state.subscribe(Box::new(RecordingObserver::default()));
        assert_eq!(state.subscriber_count(), 2);

        state.unsubscribe(first);
        state.unsubscribe(first);
        assert_eq!(state.subscriber_count(), 1);
    }

    #[test]
    fn unsubscribe_from_inside_a_callback() {
        #[derive(Debug)]
        struct DetachOthers {
            state: Arc<TagState>,
            others: Mutex<Vec<TagSubscription>>,
        }

        impl TagStateObserver for DetachOthers {
            fn on_tag_data(&self, _data: String) {
                for subscription in self.others.lock().drain(..) {
                    self.state.unsubscribe(subscription);
                }
            }
        }

        let state = Arc::new(TagState::new());
        let detacher = Arc::new(DetachOthers { state: state.clone(), others: Mutex::new(vec![]) });

        #[derive(Debug)]
        struct Forward(Arc<DetachOthers>);
        impl TagStateObserver for Forward {
            fn on_tag_data(&self, data: String) {
                self.0.on_tag_data(data)
            }
        }

        state.subscribe(Box::new(Forward(detacher.clone())));
        let observer = RecordingObserver::default();
        let subscription = state.subscribe(Box::new(observer.clone()));
        detacher.others.lock().push(subscription);

        state.publish("value".into());
        assert!(observer.values().is_empty());
    }

    #[test]
    fn publish_from_inside_a_callback_wins() {
        #[derive(Debug)]
        struct Republish(Arc<TagState>);
        impl TagStateObserver for Republish {
            fn on_tag_data(&self, data: String) {
                if data == "original" {
                    self.0.publish("replacement".into());
                }
            }
        }

        let state = Arc::new(TagState::new());
        state.subscribe(Box::new(Republish(state.clone())));
        let observer = RecordingObserver::default();
        state.subscribe(Box::new(observer.clone()));

        state.publish("original".into());

        assert_eq!(observer.values(), vec!["replacement"]);
        assert_eq!(state.current().as_deref(), Some("replacement"));
    }

    #[test]
    fn no_delivery_after_unsubscribe_returns_across_threads() {
        let state = Arc::new(TagState::new());
        let observer = RecordingObserver::default();
        let subscription = state.subscribe(Box::new(observer.clone()));

        let barrier = Arc::new(Barrier::new(2));
        let publisher = {
            let state = state.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for i in 0..1000 {
                    state.publish(format!("value {i}"));
                }
            })
        };

        barrier.wait();
        state.unsubscribe(subscription);
        let seen_at_unsubscribe = observer.values().len();

        publisher.join().unwrap();
        assert_eq!(observer.values().len(), seen_at_unsubscribe);
    }
}
