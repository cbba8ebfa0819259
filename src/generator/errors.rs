//! Binding generation errors.

use thiserror::Error;

/// Error raised while turning registry entries into D declarations.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to write generated output: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed entry `{name}`: {reason}")]
    MalformedEntry { name: String, reason: String },

    #[error(
        "struct `{structure}` derives structure type `{token}`, which VkStructureType does not declare\n\
         help: add the struct to the structure type override table or disable `strict_struct_types`"
    )]
    UnregisteredDiscriminator { structure: String, token: String },

    #[error("`{operation}` called {state}")]
    BlockState {
        operation: &'static str,
        state: &'static str,
    },
}

impl GenerateError {
    pub(crate) fn malformed(name: &str, reason: impl Into<String>) -> Self {
        GenerateError::MalformedEntry {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
