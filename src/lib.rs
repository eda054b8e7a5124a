// Library surface for headless/integration tests and reuse.
// The terminal UI lives in the binary (main.rs + ui/).
pub mod app_dirs;
pub mod catalog;
pub mod certificate;
pub mod config;
pub mod course;
pub mod export;
pub mod language;
pub mod logging;
pub mod persistence;
pub mod progress;
pub mod quiz;
pub mod runtime;
pub mod scene;
pub mod sequencer;

pub use course::Course;
