//! High-level concatenation API.
//!
//! Provides the main public entry points:
//! - `concatenate()` - annotate a parsed document in place
//! - `concatenate_json()` - parse, annotate and serialize in one call
//! - `concatenate_to_writer()` - same, writing to any `io::Write`

use std::io::Write;

use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, debug_span};

use crate::emit::emit_boxes;
use crate::error::Result;
use crate::grouping::{alignments, group_boxes};
use crate::index::AnnotationIndex;
use crate::merge::merge_groups;
use crate::metadata::APP_IDENTIFIER;
use crate::model::{AnnotationType, Document, View, ViewMetadata};
use crate::params::ConcatParams;

/// Options for a concatenation run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcatOptions {
    /// Filter and stamp parameters.
    pub params: ConcatParams,

    /// App identifier recorded on the new view.
    pub app: String,

    /// Pretty-print serialized output.
    pub pretty: bool,

    /// The `name -> values` map the run was invoked with, recorded as is on
    /// the new view. Without one, the resolved `params` are recorded.
    pub parameters: Option<IndexMap<String, Vec<String>>>,
}

impl ConcatOptions {
    /// Options resolved from an invocation parameter map, which is kept for
    /// the new view's metadata.
    pub fn from_parameters(parameters: IndexMap<String, Vec<String>>) -> Result<Self> {
        Ok(Self {
            params: ConcatParams::from_parameters(&parameters)?,
            parameters: Some(parameters),
            ..Self::default()
        })
    }

    fn recorded_parameters(&self) -> Map<String, Value> {
        let Some(parameters) = &self.parameters else {
            return self.params.to_json();
        };
        parameters
            .iter()
            .map(|(name, values)| {
                let value = match values.as_slice() {
                    [single] => Value::from(single.as_str()),
                    many => Value::from(many.to_vec()),
                };
                (name.clone(), value)
            })
            .collect()
    }
}

impl Default for ConcatOptions {
    fn default() -> Self {
        Self {
            params: ConcatParams::default(),
            app: APP_IDENTIFIER.to_string(),
            pretty: false,
            parameters: None,
        }
    }
}

/// What a run added to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatSummary {
    /// Id of the view holding the emitted records.
    pub view_id: String,

    /// Number of time values that received a merged box.
    pub groups: usize,

    /// Number of input boxes that contributed to a merged box.
    pub boxes: usize,
}

/// Concatenates the aligned boxes of `doc` and appends the result as a new
/// view.
///
/// Either the whole run succeeds and exactly one view is appended, or an
/// error is returned and `doc` is left untouched.
///
/// # Example
/// ```ignore
/// use boxcat_core::api::concatenate;
/// use boxcat_core::model::Document;
///
/// let mut doc = Document::from_json(&std::fs::read_to_string("input.mmif")?)?;
/// let summary = concatenate(&mut doc, None)?;
/// println!("{} boxes in {}", summary.groups, summary.view_id);
/// ```
pub fn concatenate(doc: &mut Document, options: Option<ConcatOptions>) -> Result<ConcatSummary> {
    let options = options.unwrap_or_default();
    let params = &options.params;
    let _span = debug_span!("concatenate", box_type = %params.box_type).entered();

    let index = AnnotationIndex::build(&*doc);
    let edges = alignments(&*doc)?;
    debug!(edges = edges.len(), "collected alignment edges");
    let groups = group_boxes(&edges, &index, &params.box_type)?;
    let boxes: usize = groups.values().map(Vec::len).sum();
    let merged = merge_groups(&groups)?;

    let mut view = new_view(doc, &options);
    emit_boxes(&merged, &mut view, params);

    let summary = ConcatSummary {
        view_id: view.id.clone(),
        groups: merged.len(),
        boxes,
    };
    doc.push_view(view);
    Ok(summary)
}

/// Parses `json`, concatenates, and serializes the annotated document.
pub fn concatenate_json(json: &str, options: Option<ConcatOptions>) -> Result<String> {
    let options = options.unwrap_or_default();
    let pretty = options.pretty;
    let mut doc = Document::from_json(json)?;
    concatenate(&mut doc, Some(options))?;
    doc.to_json(pretty)
}

/// Like `concatenate_json`, writing the annotated document to `writer`.
pub fn concatenate_to_writer<W: Write>(
    json: &str,
    writer: &mut W,
    options: Option<ConcatOptions>,
) -> Result<ConcatSummary> {
    let options = options.unwrap_or_default();
    let pretty = options.pretty;
    let mut doc = Document::from_json(json)?;
    let summary = concatenate(&mut doc, Some(options))?;
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &doc)?;
    } else {
        serde_json::to_writer(&mut *writer, &doc)?;
    }
    writer.write_all(b"\n")?;
    Ok(summary)
}

/// Creates the (detached) output view, declaring every type it will hold.
fn new_view(doc: &Document, options: &ConcatOptions) -> View {
    let params = &options.params;
    let mut metadata = ViewMetadata {
        app: Some(options.app.clone()),
        timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
        parameters: Some(options.recorded_parameters()),
        ..ViewMetadata::default()
    };

    metadata.contains.insert(
        AnnotationType::TimePoint.uri(),
        declare(&[("timeUnit", Value::from(params.time_unit.as_str()))]),
    );
    metadata.contains.insert(
        AnnotationType::BoundingBox.uri(),
        declare(&[("boxType", Value::from(params.box_type.as_str()))]),
    );
    metadata.contains.insert(
        AnnotationType::Alignment.uri(),
        declare(&[
            ("sourceType", Value::from(AnnotationType::TimePoint.uri())),
            ("targetType", Value::from(AnnotationType::BoundingBox.uri())),
        ]),
    );

    View::new(doc.next_view_id(), metadata)
}

fn declare(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
