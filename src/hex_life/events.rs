//! Change notifications pushed to renderers and other observers

use super::coord::HexCoord;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Something observable happened to the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    /// The grid changed size; never sent for a no-op resize
    Resized { from: u32, to: u32 },
    /// A single cell was set or toggled from outside
    CellChanged { coord: HexCoord, alive: bool },
    /// A new alive-set was loaded
    Loaded { alive: usize },
    /// A generation completed
    Ticked { generation: u64 },
}

/// Fan-out list of event subscribers
#[derive(Debug, Default)]
pub struct Notifier {
    subscribers: Vec<Sender<GridEvent>>,
}

impl Notifier {
    pub fn subscribe(&mut self) -> Receiver<GridEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Send to every live subscriber, forgetting the ones whose receiver is gone
    pub fn emit(&mut self, event: GridEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
