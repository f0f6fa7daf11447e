//! Process-level plumbing: settings file, logging, and the outer frame loop
//! that turns failures into a crash report.

pub mod config;
pub mod logging;
pub mod runner;

pub use config::AppConfig;
pub use runner::App;
