use thiserror::Error;

/// Defines errors that may occur while loading a translation catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Error when failing to read the catalog file
    #[error("Failed to read catalog file: {0}")]
    Read(String),
    /// Error when the XML itself is malformed
    #[error("Malformed XML at line {line}: {message}")]
    Xml { line: u32, message: String },
    /// A required child element is absent
    #[error("<{parent}> at line {line} has no <{element}>")]
    MissingElement { element: &'static str, parent: &'static str, line: u32 },
    /// The document is XML but not a Qt Linguist catalog
    #[error("Not a Qt Linguist catalog: root element is <{0}>")]
    UnexpectedRoot(String),
    /// The document ended before `</TS>`
    #[error("Unexpected end of catalog inside <{0}>")]
    UnexpectedEof(String),
}

impl CatalogError {
    /// Catalog line the error points at, when known
    #[must_use]
    pub const fn line(&self) -> Option<u32> {
        match self {
            Self::Xml { line, .. } | Self::MissingElement { line, .. } => Some(*line),
            Self::Read(_) | Self::UnexpectedRoot(_) | Self::UnexpectedEof(_) => None,
        }
    }
}
