/// Convenience result type used across pagewright.
pub type PagewrightResult<T> = Result<T, PagewrightError>;

/// Top-level error taxonomy used at the crate boundaries.
///
/// Resolution and URL composition never fail; these errors come from loading and
/// validating snapshots, looking pages up by id, and refused parent assignments.
#[derive(thiserror::Error, Debug)]
pub enum PagewrightError {
    /// Invalid snapshot data or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// A routing operation was refused or referenced an unknown page.
    #[error("routing error: {0}")]
    Routing(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PagewrightError {
    /// Build a [`PagewrightError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PagewrightError::Routing`] value.
    pub fn routing(msg: impl Into<String>) -> Self {
        Self::Routing(msg.into())
    }

    /// Build a [`PagewrightError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
