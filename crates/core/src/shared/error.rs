use thiserror::Error;

/// Error type returned by wrapped single-image components.
///
/// Adapters never translate these; they travel through
/// [`VideoError::Component`] unchanged.
pub type ComponentError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum VideoError {
    #[error("could not resolve component `{name}`: {reason}")]
    ComponentResolution { name: String, reason: String },
    #[error("precondition violated: {0}")]
    Precondition(String),
    #[error("corrupt frame container: {0}")]
    CorruptContainer(String),
    #[error("not a frame container: {0}")]
    NotAContainer(String),
    #[error("frame index {0} is already present in the container")]
    DuplicateIndex(usize),
    #[error("invalid frame selector: {0}")]
    InvalidSelector(String),
    #[error("invalid max age: {0}")]
    InvalidMaxAge(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error(transparent)]
    Component(ComponentError),
}

impl VideoError {
    pub fn component(err: ComponentError) -> Self {
        VideoError::Component(err)
    }

    /// Converts back into the component error type, unwrapping errors
    /// that came from a wrapped component.
    pub fn into_component_error(self) -> ComponentError {
        match self {
            VideoError::Component(inner) => inner,
            other => Box::new(other),
        }
    }
}
