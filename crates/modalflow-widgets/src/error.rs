#![forbid(unsafe_code)]

//! Error types for modal construction and display.

use std::fmt;

use modalflow_core::ModalId;

/// Failure reported by a [`ContentSource`](crate::content::ContentSource).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalError {
    /// Template name that was requested.
    pub name: String,
    /// Transport status, when the source has one.
    pub status: Option<u16>,
    pub message: String,
}

impl RetrievalError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl fmt::Display for RetrievalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(
                f,
                "failed to retrieve template '{}' ({code}): {}",
                self.name, self.message
            ),
            None => write!(
                f,
                "failed to retrieve template '{}': {}",
                self.name, self.message
            ),
        }
    }
}

impl std::error::Error for RetrievalError {}

/// An override document that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Toml(String),
    Json(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml(msg) => write!(f, "invalid TOML options: {msg}"),
            Self::Json(msg) => write!(f, "invalid JSON options: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors surfaced by modal construction and lifecycle calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalError {
    /// No template name was given and the behavior supplies none.
    MissingTemplate,
    /// The modal already reached its terminal state.
    Closed(ModalId),
    Retrieval(RetrievalError),
    Config(ConfigError),
}

impl fmt::Display for ModalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTemplate => {
                f.write_str("a template name is required when the modal class defines none")
            }
            Self::Closed(id) => write!(f, "{id} is closed"),
            Self::Retrieval(err) => fmt::Display::fmt(err, f),
            Self::Config(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for ModalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Retrieval(err) => Some(err),
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RetrievalError> for ModalError {
    fn from(err: RetrievalError) -> Self {
        Self::Retrieval(err)
    }
}

impl From<ConfigError> for ModalError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn retrieval_error_message_includes_status() {
        let err = RetrievalError::new("confirm", "not found").with_status(404);
        assert_eq!(
            err.to_string(),
            "failed to retrieve template 'confirm' (404): not found"
        );
    }

    #[test]
    fn modal_error_exposes_source() {
        let err: ModalError = RetrievalError::new("x", "boom").into();
        assert!(err.source().is_some());
        assert!(ModalError::MissingTemplate.source().is_none());
    }
}
