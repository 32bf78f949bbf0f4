//! Builder pattern for concatenation runs.
//!
//! Provides a fluent API for configuring and executing a run.
//!
//! # Example
//! ```ignore
//! use boxcat_core::api::ConcatBuilder;
//! use boxcat_core::params::TimeUnit;
//!
//! let output = ConcatBuilder::new()
//!     .time_unit(TimeUnit::Milliseconds)
//!     .box_type("face")
//!     .pretty(true)
//!     .run_json(&input)?;
//! ```

use std::path::Path;

use crate::error::Result;
use crate::model::Document;
use crate::params::{ConcatParams, TimeUnit};

use super::high_level::{ConcatOptions, ConcatSummary, concatenate, concatenate_json};

/// A builder for configuring a concatenation run.
///
/// Wraps the underlying `ConcatOptions` and entry points.
#[derive(Debug, Clone, Default)]
pub struct ConcatBuilder {
    options: ConcatOptions,
}

impl ConcatBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the unit stamped on emitted time points.
    pub fn time_unit(mut self, unit: TimeUnit) -> Self {
        self.options.params.time_unit = unit;
        self
    }

    /// Sets the box category to concatenate.
    ///
    /// Only boxes tagged with this category take part, and emitted boxes
    /// carry it.
    pub fn box_type(mut self, box_type: impl Into<String>) -> Self {
        self.options.params.box_type = box_type.into();
        self
    }

    /// Replaces both parameters at once.
    pub fn params(mut self, params: ConcatParams) -> Self {
        self.options.params = params;
        self
    }

    /// Sets the app identifier recorded on the new view.
    pub fn app_identifier(mut self, app: impl Into<String>) -> Self {
        self.options.app = app.into();
        self
    }

    /// Pretty-print serialized output (default: false).
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.options.pretty = enabled;
        self
    }

    /// The options this builder would run with.
    pub fn options(&self) -> &ConcatOptions {
        &self.options
    }

    /// Annotates `doc` in place.
    pub fn run(self, doc: &mut Document) -> Result<ConcatSummary> {
        concatenate(doc, Some(self.options))
    }

    /// Annotates a serialized document and returns the serialized result.
    pub fn run_json(self, json: &str) -> Result<String> {
        concatenate_json(json, Some(self.options))
    }

    /// Reads a document from `path` and returns the serialized result.
    pub fn run_file(self, path: impl AsRef<Path>) -> Result<String> {
        let json = std::fs::read_to_string(path)?;
        self.run_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_options() {
        let builder = ConcatBuilder::new()
            .time_unit(TimeUnit::Seconds)
            .box_type("face")
            .app_identifier("test-app")
            .pretty(true);
        let options = builder.options();
        assert_eq!(options.params, ConcatParams::new(TimeUnit::Seconds, "face"));
        assert_eq!(options.app, "test-app");
        assert!(options.pretty);
    }

    #[test]
    fn test_builder_defaults() {
        let builder = ConcatBuilder::new();
        assert_eq!(builder.options(), &ConcatOptions::default());
    }
}
