//! # Tableau core
//!
//! Plain data shared by every Tableau crate. Nothing in here knows about the
//! element tree; the engine lives in `tableau-ui`.
//!
//! - `geometry`: integer pixel `Vec2`, `Size`, `Rect`.
//! - `color` / `style`: colors and the serde-configurable `Style`.
//! - `input`: raw backend events and their per-frame aggregate.
//! - `picture`: the draw-command lists elements cache as render output.
//! - `backend`: the display contract, plus an in-memory implementation.
//! - `interaction`: hover/click/focus state with linear fades.
//! - `error`: the `UiError` taxonomy.

pub mod backend;
pub mod color;
pub mod error;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod picture;
pub mod style;

pub use backend::{Backend, HeadlessBackend, SurfaceSpec, TextMetrics};
pub use color::*;
pub use error::*;
pub use geometry::*;
pub use input::*;
pub use interaction::*;
pub use picture::*;
pub use style::*;
