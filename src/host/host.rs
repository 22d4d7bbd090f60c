use std::collections::VecDeque;

use crate::dom::dom_model::NodeId;
use crate::hint::hint_model::{Overlay, SyntheticEvent};

/// Side effects a hint session asks of the host view.
pub trait HostView {
    /// Adds the populated overlay to the document (or the hosting modal).
    fn mount_overlay(&mut self, overlay: &Overlay);

    /// Re-renders markers and the input display after a keystroke.
    fn refresh_overlay(&mut self, overlay: &Overlay);

    /// Removes the overlay; closes the hosting modal when anchored to one.
    fn unmount_overlay(&mut self, overlay: &Overlay);

    /// Installs the window-level capturing keydown listener.
    fn install_key_capture(&mut self);

    fn remove_key_capture(&mut self);

    /// Dispatches an event through the normal, bubbling event path.
    fn dispatch(&mut self, event: &SyntheticEvent);

    fn focus(&mut self, node: NodeId);
}

/// Work that has to run after the current event-handling turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    FinalizeClose,
    Focus(NodeId),
}

#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: VecDeque<Deferred>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task: Deferred) {
        self.tasks.push_back(task);
    }

    pub fn pop(&mut self) -> Option<Deferred> {
        self.tasks.pop_front()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn pending(&self) -> Vec<Deferred> {
        self.tasks.iter().copied().collect()
    }
}
