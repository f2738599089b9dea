//! Change notifications raised by sampled properties.
//!
//! Listeners are called synchronously, in subscription order, after the mutation that
//! raised the event has completed.

use serde::{Deserialize, Serialize};

use crate::config::ExtrapolationType;
use crate::ids::{IdAllocator, SubscriptionId};

/// Definition changes of a sampled property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PropertyEvent {
    /// Samples were merged into the store.
    SamplesMerged {
        inserted: usize,
        overwritten: usize,
        len: usize,
    },
    /// Interpolation algorithm or degree changed.
    InterpolationChanged { algorithm: String, degree: usize },
    /// Extrapolation behavior before or after the sampled range changed.
    ExtrapolationChanged {
        forward: ExtrapolationType,
        forward_duration: f64,
        backward: ExtrapolationType,
        backward_duration: f64,
    },
}

impl PropertyEvent {
    /// Get the name of this event
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SamplesMerged { .. } => "samples_merged",
            Self::InterpolationChanged { .. } => "interpolation_changed",
            Self::ExtrapolationChanged { .. } => "extrapolation_changed",
        }
    }
}

type Listener = Box<dyn FnMut(&PropertyEvent) + Send>;

/// Ordered list of change listeners.
#[derive(Default)]
pub struct ChangeNotifier {
    ids: IdAllocator,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PropertyEvent) + Send + 'static,
    {
        let id = self.ids.alloc_subscription();
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn raise(&mut self, event: &PropertyEvent) {
        log::trace!(
            "raising {} to {} listener(s)",
            event.name(),
            self.listeners.len()
        );
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn delivers_in_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = ChangeNotifier::new();
        for tag in ["a", "b"] {
            let seen = Arc::clone(&seen);
            notifier.subscribe(move |event| seen.lock().unwrap().push((tag, event.name())));
        }
        notifier.raise(&PropertyEvent::InterpolationChanged {
            algorithm: "linear".into(),
            degree: 1,
        });
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                ("a", "interpolation_changed"),
                ("b", "interpolation_changed"),
            ]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Arc::new(Mutex::new(0));
        let mut notifier = ChangeNotifier::new();
        let id = {
            let count = Arc::clone(&count);
            notifier.subscribe(move |_| *count.lock().unwrap() += 1)
        };
        let event = PropertyEvent::SamplesMerged {
            inserted: 1,
            overwritten: 0,
            len: 1,
        };
        notifier.raise(&event);
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.raise(&event);
        assert_eq!(*count.lock().unwrap(), 1);
        assert!(notifier.is_empty());
    }
}
