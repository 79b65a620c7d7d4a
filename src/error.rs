/// Error types for drawing operations.
use thiserror::Error;

/// Result type for drawing operations.
pub type Result<T> = std::result::Result<T, DrawingError>;

/// Error types for drawing operations.
#[derive(Error, Debug)]
pub enum DrawingError {
    /// XML parsing or serialization error
    #[error("XML error: {0}")]
    Xml(String),

    /// Picture index outside the workbook picture collection
    #[error("picture index {index} out of range for collection of {count}")]
    PictureIndexOutOfRange { index: usize, count: usize },

    /// A generic shape handle held a different concrete variant
    #[error("expected a {expected} handle, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Operation requires an owning worksheet but none is attached
    #[error("drawing is not attached to a worksheet")]
    MissingParent,

    /// Invalid part name
    #[error("invalid part name: {0}")]
    InvalidPartName(String),

    /// Relationship not found
    #[error("relationship not found: {0}")]
    RelationshipNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for DrawingError {
    fn from(err: quick_xml::Error) -> Self {
        DrawingError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for DrawingError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        DrawingError::Xml(err.to_string())
    }
}

impl From<std::str::Utf8Error> for DrawingError {
    fn from(err: std::str::Utf8Error) -> Self {
        DrawingError::Xml(err.to_string())
    }
}
