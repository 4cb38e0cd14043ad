use std::collections::VecDeque;

/// Identifies one subscriber queue on an [`EventBus`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u32);

/// Receiving end of a subscription.
///
/// Not `Clone`: whoever holds it is the only reader of its queue.
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    id: SubscriberId,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }
}

/// An event stamped with its publish order.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<E> {
    pub seq: u64,
    pub event: E,
}

/// Single-threaded fan-out bus.
///
/// Each subscriber gets its own FIFO queue. Publishing never calls back into
/// subscribers; they drain their queue when the owner pumps the bus, which
/// keeps producers and consumers decoupled and the ordering deterministic.
#[derive(Debug)]
pub struct EventBus<E> {
    next_seq: u64,
    next_id: u32,
    queues: Vec<(SubscriberId, VecDeque<Envelope<E>>)>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            next_id: 0,
            queues: Vec::new(),
        }
    }
}

impl<E: Clone> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Subscription {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.queues.push((id, VecDeque::new()));
        Subscription { id }
    }

    /// Drops the subscriber's queue. Returns the number of undelivered events.
    pub fn unsubscribe(&mut self, sub: Subscription) -> usize {
        match self.queues.iter().position(|(id, _)| *id == sub.id) {
            Some(pos) => self.queues.remove(pos).1.len(),
            None => 0,
        }
    }

    /// Enqueues `event` for every current subscriber and returns its sequence number.
    pub fn publish(&mut self, event: E) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        for (_, queue) in &mut self.queues {
            queue.push_back(Envelope {
                seq,
                event: event.clone(),
            });
        }
        seq
    }

    pub fn drain(&mut self, sub: &Subscription) -> Vec<Envelope<E>> {
        self.queue_mut(sub)
            .map(|q| q.drain(..).collect())
            .unwrap_or_default()
    }

    /// Drains the queue and keeps only the newest event.
    pub fn drain_latest(&mut self, sub: &Subscription) -> Option<Envelope<E>> {
        let queue = self.queue_mut(sub)?;
        let last = queue.pop_back();
        queue.clear();
        last
    }

    pub fn pending(&self, sub: &Subscription) -> usize {
        self.queues
            .iter()
            .find(|(id, _)| *id == sub.id)
            .map(|(_, q)| q.len())
            .unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.queues.len()
    }

    pub fn published(&self) -> u64 {
        self.next_seq
    }

    fn queue_mut(&mut self, sub: &Subscription) -> Option<&mut VecDeque<Envelope<E>>> {
        self.queues
            .iter_mut()
            .find(|(id, _)| *id == sub.id)
            .map(|(_, q)| q)
    }
}
