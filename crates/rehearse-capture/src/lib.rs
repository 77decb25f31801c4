//! rehearse-capture — Answer-capture sources.
//!
//! Implements the `CaptureSource` trait for scripted transcript playback,
//! a manually driven source for tests, and an unsupported placeholder, plus
//! the `rehearse.toml` configuration that selects between them.

pub mod config;
pub mod mock;
pub mod scripted;
pub mod unsupported;

pub use config::{create_capture, load_config_from, CaptureConfig, RehearseConfig};
pub use scripted::ScriptedCapture;
pub use unsupported::Unsupported;
