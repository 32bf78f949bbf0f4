//! Re-materialization of merged boxes as fresh annotation records.

use serde_json::{Map, Value};
use tracing::debug;

use crate::merge::MergedBoxes;
use crate::model::record::{number_value, points_value};
use crate::model::{AnnotationSink, AnnotationType};
use crate::params::ConcatParams;

/// Identifiers of one emitted time point / box / alignment triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedTriple {
    pub time_point: String,
    pub bounding_box: String,
    pub alignment: String,
}

/// Writes a time point, a box and an alignment between them into `sink`
/// for every merged box.
///
/// The time point carries `params.time_unit`, the box `params.box_type`.
pub fn emit_boxes<S>(merged: &MergedBoxes, sink: &mut S, params: &ConcatParams) -> Vec<EmittedTriple>
where
    S: AnnotationSink + ?Sized,
{
    let mut emitted = Vec::with_capacity(merged.len());
    for (time, coordinates) in merged {
        let mut props = Map::new();
        props.insert(
            "timeUnit".to_string(),
            Value::String(params.time_unit.as_str().to_string()),
        );
        props.insert("timePoint".to_string(), number_value(time.into_inner()));
        let time_point = sink.add_annotation(AnnotationType::TimePoint, props);

        let mut props = Map::new();
        props.insert(
            "boxType".to_string(),
            Value::String(params.box_type.clone()),
        );
        props.insert("coordinates".to_string(), points_value(coordinates));
        let bounding_box = sink.add_annotation(AnnotationType::BoundingBox, props);

        let mut props = Map::new();
        props.insert("source".to_string(), Value::String(time_point.clone()));
        props.insert("target".to_string(), Value::String(bounding_box.clone()));
        let alignment = sink.add_annotation(AnnotationType::Alignment, props);

        emitted.push(EmittedTriple {
            time_point,
            bounding_box,
            alignment,
        });
    }
    debug!(triples = emitted.len(), "emitted merged boxes");
    emitted
}
