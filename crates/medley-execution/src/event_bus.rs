//! Tokio-mpsc implementation of the event channel.
//!
//! Used by embedders and tests. Sends are non-blocking; if the receiver has
//! been dropped the event is skipped.

use medley_core::event::{EventChannel, TaskEvent};
use tokio::sync::mpsc;

/// A message on the bus: a task event or the end-of-task signal.
#[derive(Debug, Clone)]
pub enum BusMessage {
    Event(TaskEvent),
    Finished,
}

/// Event channel backed by an unbounded tokio mpsc sender.
pub struct MpscEventChannel {
    sender: mpsc::UnboundedSender<BusMessage>,
}

impl MpscEventChannel {
    /// Creates the channel, returning the publishing half and the receiver.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<BusMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventChannel for MpscEventChannel {
    fn publish(&self, event: TaskEvent) {
        let _ = self.sender.send(BusMessage::Event(event));
    }

    fn finished(&self) {
        let _ = self.sender.send(BusMessage::Finished);
    }
}
