use serde::Serialize;

use crate::dom::dom_model::NodeId;
use crate::hint::hint_model::{Overlay, OverlayAnchor, SyntheticEvent};
use crate::host::host::HostView;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HostCall {
    MountOverlay { markers: usize },
    RefreshOverlay { input: String, visible: usize },
    UnmountOverlay { closed_modal: bool },
    InstallKeyCapture,
    RemoveKeyCapture,
    Dispatch(SyntheticEvent),
    Focus(NodeId),
}

/// Host that records every request instead of touching a real view.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
    pub overlay: Option<Overlay>,
    pub key_capture: bool,
    pub focused: Option<NodeId>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> Vec<&SyntheticEvent> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Dispatch(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matcher: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.iter().filter(|c| matcher(c)).count()
    }
}

impl HostView for RecordingHost {
    fn mount_overlay(&mut self, overlay: &Overlay) {
        self.calls.push(HostCall::MountOverlay {
            markers: overlay.markers.len(),
        });
        self.overlay = Some(overlay.clone());
    }

    fn refresh_overlay(&mut self, overlay: &Overlay) {
        self.calls.push(HostCall::RefreshOverlay {
            input: overlay.input_display.clone(),
            visible: overlay.visible().len(),
        });
        self.overlay = Some(overlay.clone());
    }

    fn unmount_overlay(&mut self, overlay: &Overlay) {
        self.calls.push(HostCall::UnmountOverlay {
            closed_modal: matches!(overlay.anchor, OverlayAnchor::Modal(_)),
        });
        self.overlay = None;
    }

    fn install_key_capture(&mut self) {
        self.calls.push(HostCall::InstallKeyCapture);
        self.key_capture = true;
    }

    fn remove_key_capture(&mut self) {
        self.calls.push(HostCall::RemoveKeyCapture);
        self.key_capture = false;
    }

    fn dispatch(&mut self, event: &SyntheticEvent) {
        self.calls.push(HostCall::Dispatch(event.clone()));
    }

    fn focus(&mut self, node: NodeId) {
        self.calls.push(HostCall::Focus(node));
        self.focused = Some(node);
    }
}
