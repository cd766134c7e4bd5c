//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::Event;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Effect attachment, health changes, shield blocks
    Combat,
    /// Spawns, deaths, reaping
    Lifecycle,
    /// Gold changes
    Economy,
    /// Per-step summaries
    Tick,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Combat, Topic::Lifecycle, Topic::Economy, Topic::Tick];
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Cloning is cheap; clones share the channels.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    ///
    /// Events are best-effort: with no subscriber on the topic the event is
    /// dropped.
    pub fn publish(&self, event: Event) {
        if let Some(sender) = self.channels.get(&event.topic()) {
            let _ = sender.send(event);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.get(&topic) {
            Some(sender) => sender.subscribe(),
            // Every topic is created up front.
            None => broadcast::channel(1).1,
        }
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    /// Number of live subscribers on `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.channels
            .get(&topic)
            .map_or(0, broadcast::Sender::receiver_count)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::TickEvent;
    use defense_core::Tick;

    fn tick_event(tick: u64) -> Event {
        Event::Tick(TickEvent {
            tick: Tick(tick),
            tasks_run: 0,
            pulses: 0,
            expired: 0,
            deaths: 0,
            reaped: 0,
        })
    }

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::new();
        let mut ticks = bus.subscribe(Topic::Tick);
        let mut combat = bus.subscribe(Topic::Combat);

        bus.publish(tick_event(1));

        assert!(matches!(ticks.recv().await, Ok(Event::Tick(_))));
        assert!(combat.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::with_capacity(4);
        assert_eq!(bus.subscriber_count(Topic::Tick), 0);
        bus.publish(tick_event(1));
    }
}
