use thiserror::Error;

/// Structural violations of the element tree.
///
/// These are programming mistakes in stage or widget code; they surface at the
/// call site and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("key `{0}` used for two different elements in the same container")]
    DuplicateKey(String),
    #[error("element #{0:06x} added twice to the same container")]
    AddedTwice(u32),
    #[error("element #{0:06x} can't have two parents")]
    AlreadyParented(u32),
    #[error("reassigning container key `{0}` isn't supported; delete and add again")]
    KeyReassigned(String),
    #[error("element #{0:06x} queued for deletion while an ancestor is already queued")]
    AncestorQueued(u32),
    #[error("the root container can't be deleted")]
    RootDeletion,
    #[error("element #{0:06x} would become its own ancestor")]
    Cycle(u32),
    #[error("element #{0:06x} is not a container")]
    NotAContainer(u32),
    #[error("element handle is stale or belongs to another engine")]
    UnknownElement,
}

#[derive(Debug, Error)]
pub enum UiError {
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("rendering error: {0}")]
    Rendering(String),
    #[error("media error: {0}")]
    Media(String),
    #[error("usage error: {0}")]
    Usage(String),
}

pub type Result<T, E = UiError> = std::result::Result<T, E>;
