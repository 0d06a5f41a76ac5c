//! `rodio` playback backend.
//!
//! A single audio thread owns the output stream and at most one sink. The
//! [`RodioMedia`] handle drives it for the playback coordinator.

mod player;
mod sink;
mod source;
mod thread;
mod types;

pub use player::RodioMedia;

#[cfg(test)]
mod tests;
