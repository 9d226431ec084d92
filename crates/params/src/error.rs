use thiserror::Error;

/// A client-caused problem with the submitted form.
///
/// The message is shown to the caller verbatim, so it names the offending
/// field and never carries internal detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn invalid_number(field: &str) -> Self {
        Self::new(format!("Invalid numeric value for {field}."))
    }

    pub fn invalid_flag(field: &str) -> Self {
        Self::new(format!("Invalid boolean value for {field}."))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
