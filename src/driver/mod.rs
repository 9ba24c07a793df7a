//! Asynchronous generation drivers

/// Debounced single-slot background preview generation
pub mod preview;

pub use preview::{PreviewDriver, PreviewEvent, PreviewRequest};
