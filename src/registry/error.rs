use thiserror::Error;

use crate::error::FixSuggestion;

/// Ways a polymorphic decode can fail
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The payload is not a syntactically valid JSON object
    #[error("{0}")]
    Parse(#[source] serde_json::Error),

    /// None of the candidate discriminator fields are present
    #[error("Missing JSON Property \"{}\"", .tags.join("\", \""))]
    MissingDiscriminator { tags: Vec<String> },

    /// The discriminator names a type nobody registered
    #[error("Unsupported Type \"{tag}\"")]
    UnsupportedType { tag: String },

    /// The type resolved but the payload does not fit it
    #[error("Failed to decode \"{tag}\": {source}")]
    Decode {
        tag: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FixSuggestion for RegistryError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            RegistryError::Parse(_) => Some("Check JSON syntax (try parsing with jq)"),
            RegistryError::MissingDiscriminator { .. } => {
                Some("Add a \"type\" field to the payload or pass its actual field name")
            }
            RegistryError::UnsupportedType { .. } => {
                Some("Register the type before decoding, or fix the type tag")
            }
            RegistryError::Decode { .. } => {
                Some("Make the payload fields match the registered type")
            }
        }
    }
}
