// SPDX-License-Identifier: GPL-3.0-only

//! Event fan-out
//!
//! Subscribers get their own unbounded channel wrapped in a `Stream`; a
//! dropped receiver is pruned on the next emit. Emission never blocks, so
//! the monitor can publish while holding its own state.

use futures::stream::Stream;
use futures::task::{Context, Poll};
use tokio::sync::mpsc;
use tracing::debug;

/// Sender side: one per observable object, many subscribers.
#[derive(Debug, Default)]
pub struct EventFanout<T> {
    senders: Vec<mpsc::UnboundedSender<T>>,
}

impl<T> EventFanout<T> {
    pub fn new() -> Self {
        Self {
            senders: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> EventStream<T> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.senders.push(sender);
        EventStream { receiver }
    }
}

impl<T: Clone> EventFanout<T> {
    pub fn emit(&mut self, event: T) {
        self.senders.retain(|sender| {
            let alive = sender.send(event.clone()).is_ok();
            if !alive {
                debug!("event receiver dropped, pruning subscription");
            }
            alive
        });
    }
}

/// Receiver side, usable both as a `Stream` and by polling synchronously.
#[derive(Debug)]
pub struct EventStream<T> {
    receiver: mpsc::UnboundedReceiver<T>,
}

impl<T> EventStream<T> {
    /// Take the next already-delivered event, if any.
    pub fn try_recv(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Take every already-delivered event.
    pub fn drain(&mut self) -> Vec<T> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }
}

impl<T> Stream for EventStream<T> {
    type Item = T;

    fn poll_next(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_reaches_every_live_subscriber() {
        let mut fanout: EventFanout<u32> = EventFanout::new();
        let mut first = fanout.subscribe();
        let mut second = fanout.subscribe();

        fanout.emit(7);

        assert_eq!(first.try_recv(), Some(7));
        assert_eq!(second.drain(), vec![7]);
        assert_eq!(first.try_recv(), None);
    }

    #[test]
    fn dropped_receivers_are_pruned() {
        let mut fanout: EventFanout<u32> = EventFanout::new();
        let first = fanout.subscribe();
        let mut second = fanout.subscribe();

        drop(first);
        fanout.emit(1);
        fanout.emit(2);

        assert_eq!(second.drain(), vec![1, 2]);
    }
}
