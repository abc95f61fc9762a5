//! Shared application state for axum handlers.

use std::sync::Arc;

use smartheat_app::ports::HeatingControl;

/// Application state shared across all axum handlers.
///
/// Generic over the control port to avoid dynamic dispatch. `Clone` is
/// implemented manually so `H` itself does not need to be `Clone`.
pub struct AppState<H> {
    pub control: Arc<H>,
}

impl<H> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            control: Arc::clone(&self.control),
        }
    }
}

impl<H: HeatingControl + Send + Sync + 'static> AppState<H> {
    pub fn new(control: H) -> Self {
        Self::from_arc(Arc::new(control))
    }

    /// Use this when the control is shared with background tasks.
    pub fn from_arc(control: Arc<H>) -> Self {
        Self { control }
    }
}
