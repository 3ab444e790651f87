use std::collections::VecDeque;

use crate::config::MESSAGE_FADE;

#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub text: String,
    pub created: f64,
    pub expires: f64,
}

/// Short-lived banner lines ("WAVE 2", "EXTRA LIFE"). Times are on the
/// simulation clock, so messages hold still while the game is paused.
#[derive(Debug)]
pub struct MessageQueue {
    messages: VecDeque<Message>,
    capacity: usize,
}

impl MessageQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, text: impl Into<String>, now: f64, ttl: f64) {
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(Message {
            text: text.into(),
            created: now,
            expires: now + ttl,
        });
    }

    pub fn prune(&mut self, now: f64) {
        self.messages.retain(|m| m.expires > now);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Live messages, oldest first, with an opacity that fades out over the
    /// final `MESSAGE_FADE` seconds.
    pub fn visible(&self, now: f64) -> impl Iterator<Item = (&Message, f64)> {
        self.messages
            .iter()
            .filter(move |m| m.expires > now)
            .map(move |m| {
                let left = m.expires - now;
                (m, (left / MESSAGE_FADE).clamp(0.0, 1.0))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_is_evicted_at_capacity() {
        let mut queue = MessageQueue::new(2);
        queue.push("one", 0.0, 5.0);
        queue.push("two", 0.0, 5.0);
        queue.push("three", 0.0, 5.0);
        let texts: Vec<_> = queue.visible(1.0).map(|(m, _)| m.text.as_str()).collect();
        assert_eq!(texts, ["two", "three"]);
    }

    #[test]
    fn prune_drops_expired() {
        let mut queue = MessageQueue::new(4);
        queue.push("short", 0.0, 1.0);
        queue.push("long", 0.0, 3.0);
        queue.prune(1.0);
        assert_eq!(queue.len(), 1);
        queue.prune(3.5);
        assert!(queue.is_empty());
    }

    #[test]
    fn fades_near_expiry() {
        let mut queue = MessageQueue::new(4);
        queue.push("hi", 10.0, 2.0);
        let (_, alpha) = queue.visible(10.5).next().expect("visible");
        assert_eq!(alpha, 1.0);
        let (_, alpha) = queue.visible(11.75).next().expect("visible");
        assert!((alpha - 0.5).abs() < 1e-9);
        assert!(queue.visible(12.0).next().is_none());
    }
}
