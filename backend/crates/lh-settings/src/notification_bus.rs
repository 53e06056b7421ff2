use crate::{Notification, Topic};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use log::{debug, warn};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Topic-keyed fan-out of [`Notification`]s.
///
/// Each subscriber's handler runs on its own task, so `publish` never calls
/// a handler inline. Messages published while nobody is subscribed to a
/// topic are dropped; there is no replay.
#[derive(Clone)]
pub struct NotificationBus {
    inner: Arc<BusInner>,
}

struct BusInner {
    channels: Mutex<HashMap<Topic, TopicChannel>>,
    capacity: usize,
}

struct TopicChannel {
    sender: broadcast::Sender<Notification>,
    subscriber_count: usize,
}

impl BusInner {
    fn lock(&self) -> MutexGuard<'_, HashMap<Topic, TopicChannel>> {
        self.channels.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn release(&self, topic: Topic) {
        let mut channels = self.lock();

        if let Some(channel) = channels.get_mut(&topic) {
            channel.subscriber_count = channel.subscriber_count.saturating_sub(1);
            debug!(
                "Unsubscribed from {} ({} remaining subscribers)",
                topic, channel.subscriber_count
            );

            if channel.subscriber_count == 0 {
                channels.remove(&topic);
                debug!("Removed empty {} channel", topic);
            }
        }
    }
}

impl NotificationBus {
    /// # Arguments
    /// * `capacity` - Per-topic buffer; a subscriber further behind than this
    ///   skips the oldest messages
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(BusInner {
                channels: Mutex::new(HashMap::new()),
                capacity: capacity.max(1),
            }),
        }
    }

    /// Run `handler` for every notification on `topic` until the returned
    /// [`Subscription`] is unsubscribed or dropped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn subscribe<F>(&self, topic: Topic, mut handler: F) -> Subscription
    where
        F: FnMut(Notification) + Send + 'static,
    {
        let mut receiver = {
            let mut channels = self.inner.lock();
            let channel = channels.entry(topic).or_insert_with(|| {
                let (sender, _) = broadcast::channel(self.inner.capacity);
                debug!("Created {} channel", topic);
                TopicChannel {
                    sender,
                    subscriber_count: 0,
                }
            });

            channel.subscriber_count += 1;
            debug!(
                "Subscribed to {} ({} total subscribers)",
                topic, channel.subscriber_count
            );
            channel.sender.subscribe()
        };

        let task = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(notification) => handler(notification),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("{} subscriber lagged; skipped {} notifications", topic, skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        Subscription {
            topic,
            bus: Arc::downgrade(&self.inner),
            task: Some(task),
        }
    }

    /// Deliver to every current subscriber of the notification's topic.
    /// Returns how many subscribers were reached.
    pub fn publish(&self, notification: Notification) -> usize {
        let topic = notification.topic();
        let channels = self.inner.lock();

        let Some(channel) = channels.get(&topic) else {
            debug!("No {} subscribers", topic);
            return 0;
        };

        match channel.sender.send(notification) {
            Ok(receivers) => receivers,
            Err(_) => 0,
        }
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.inner
            .lock()
            .get(&topic)
            .map(|channel| channel.subscriber_count)
            .unwrap_or(0)
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

/// Handle for one subscriber. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    topic: Topic,
    bus: Weak<BusInner>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        task.abort();

        if let Some(bus) = self.bus.upgrade() {
            bus.release(self.topic);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}
