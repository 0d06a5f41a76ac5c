//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the loaded catalog, the
//! browsing selection and the last playback snapshot pushed by the
//! coordinator.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
