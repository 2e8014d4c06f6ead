//! Change notification for the presentation layer.

use malla_core::CourseStates;

/// Receives the full result set after every change.
///
/// Called while the engine still holds its lock, in mutation order.
/// Implementations must not call back into the engine.
pub trait Observer: Send + Sync {
    /// The engine state changed.
    fn on_update(&self, states: &CourseStates);
}

impl<F> Observer for F
where
    F: Fn(&CourseStates) + Send + Sync,
{
    fn on_update(&self, states: &CourseStates) {
        self(states)
    }
}
