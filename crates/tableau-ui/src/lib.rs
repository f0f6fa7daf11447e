//! # Tableau UI
//!
//! A retained element tree driven once per frame by an [`Engine`]:
//!
//! 1. **events**: raw backend events are filtered by the active stage,
//!    aggregated, and hit-tested top-most first;
//! 2. **update**: stage logic, element logic, hover/click fades, finished
//!    background jobs;
//! 3. **reflow**: containers flagged since the last frame are re-measured and
//!    their children re-placed by the container's [`Strategy`];
//! 4. **render**: visible elements redraw their cached [`Picture`] if dirty and
//!    hand it to the backend;
//! 5. **cleanup**: elements queued with [`Engine::delete`] are swept, leaves
//!    first.
//!
//! Elements live in an arena and are addressed by [`ElementId`]. Their
//! behaviour is a boxed [`Element`]; geometry, interaction state and tree
//! links are owned by the engine.
//!
//! [`Picture`]: tableau_core::Picture

pub mod element;
pub mod engine;
pub mod frame;
pub mod jobs;
pub mod layout;
pub mod listeners;
pub mod position;
pub mod widgets;

pub use element::{Action, Cx, DrawCx, Element, ElementId, MeasureCx, MenuEntry};
pub use engine::Engine;
pub use frame::FrameMetrics;
pub use jobs::{JobError, JobId};
pub use layout::{Axis, BoxLayout, Measured, StackLayout, Strategy};
pub use listeners::{EventPayload, GlobalEvent, ListenerKey};
pub use position::{Alignment, Position};
pub use tableau_stage::{ResumeFn, Stage, StageError, StageFactory, StageStack, StageTable};
