//! # Async Subscribers
//!
//! Bridges the synchronous bus to async consumers: a [`ChannelListener`]
//! forwards every event into an unbounded channel, and the receiving
//! [`EventStream`] can be awaited or used with stream combinators.

use crate::observer::{EventListener, ListenerHandle};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tracing::debug;

/// Listener that clones each event into a channel.
pub struct ChannelListener<E> {
    sender: mpsc::UnboundedSender<E>,
}

impl<E> ChannelListener<E>
where
    E: Clone + Send + 'static,
{
    /// Create a listener handle and the stream it feeds.
    ///
    /// Subscribe the handle to a bus; keep it to unsubscribe later.
    #[must_use]
    pub fn channel() -> (ListenerHandle<E>, EventStream<E>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let listener: ListenerHandle<E> = Arc::new(Self { sender });
        (listener, EventStream { receiver })
    }
}

impl<E> EventListener<E> for ChannelListener<E>
where
    E: Clone + Send,
{
    fn on_event(&self, event: &E) {
        if self.sender.send(event.clone()).is_err() {
            debug!("Event stream dropped, event discarded");
        }
    }
}

/// Receiving side of a [`ChannelListener`].
pub struct EventStream<E> {
    receiver: mpsc::UnboundedReceiver<E>,
}

impl<E> EventStream<E> {
    /// Wait for the next event.
    ///
    /// Returns `None` once the listener has been dropped by every bus.
    pub async fn recv(&mut self) -> Option<E> {
        self.receiver.recv().await
    }

    /// Take the next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<E> {
        self.receiver.try_recv().ok()
    }

    /// Drain every queued event.
    pub fn drain(&mut self) -> Vec<E> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

impl<E> Stream for EventStream<E> {
    type Item = E;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
