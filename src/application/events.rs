//! Typed wizard notifications.
//!
//! Each input callback completes its full mutation sequence (tree, then
//! points, then geometry) before events are queued, so a host draining the
//! queue observes a consistent model. Emission order within the queue
//! matches the order the state changes happened.

use crate::application::wizard::InteractionStatus;

/// Notification emitted by the placement wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    /// The interaction state machine moved to a new state.
    InteractionChanged(InteractionStatus),
    /// The wizard's current tree node changed; None when deselected.
    CurrentNodeChanged(Option<String>),
    /// Every node in the tree reached placed status for the first time.
    /// Latches until the wizard is cleared.
    PlacingFinished,
}
