//! Annotation type vocabulary.

use std::fmt;

/// Common prefix of every vocabulary type URI.
pub const VOCABULARY_PREFIX: &str = "http://mmif.clams.ai/vocabulary/";

/// MMIF specification version written into documents created from scratch.
pub const MMIF_VERSION: &str = "http://mmif.clams.ai/1.0.0";

/// The annotation types this crate distinguishes.
///
/// Type URIs are matched on their name segment only, so every version of a
/// type maps to the same variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationType {
    TimePoint,
    BoundingBox,
    Alignment,
    /// Source document (input declaration only).
    Document,
    /// Any other type, keeping the full URI.
    Other(String),
}

impl AnnotationType {
    /// Parses a type URI such as `http://mmif.clams.ai/vocabulary/TimePoint/v4`.
    pub fn from_uri(uri: &str) -> Self {
        let name = uri
            .strip_prefix(VOCABULARY_PREFIX)
            .and_then(|rest| rest.split('/').next())
            .unwrap_or("");
        match name {
            "TimePoint" => Self::TimePoint,
            "BoundingBox" => Self::BoundingBox,
            "Alignment" => Self::Alignment,
            "Document" => Self::Document,
            _ => Self::Other(uri.to_string()),
        }
    }

    /// Short type name, or the full URI for unknown types.
    pub fn name(&self) -> &str {
        match self {
            Self::TimePoint => "TimePoint",
            Self::BoundingBox => "BoundingBox",
            Self::Alignment => "Alignment",
            Self::Document => "Document",
            Self::Other(uri) => uri,
        }
    }

    /// URI written on emitted records.
    pub fn uri(&self) -> String {
        match self {
            Self::Other(uri) => uri.clone(),
            known => format!("{}{}/v1", VOCABULARY_PREFIX, known.name()),
        }
    }

    /// Prefix of generated local identifiers.
    pub(crate) fn id_prefix(&self) -> &'static str {
        match self {
            Self::TimePoint => "tp",
            Self::BoundingBox => "bb",
            Self::Alignment => "al",
            Self::Document => "d",
            Self::Other(_) => "a",
        }
    }
}

impl fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
