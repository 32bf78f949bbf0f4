//! Typed records extracted from generic annotations.
//!
//! A record is validated once, when it is built from its annotation. Past
//! that point the pipeline never asks whether a property is present.

use serde_json::{Number, Value};

use super::document::{AnnotationRef, qualify_id};
use super::vocabulary::AnnotationType;
use crate::error::{BoxcatError, Result};
use crate::geometry::Point;
use crate::params::TimeUnit;

/// A point on the media timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimePoint {
    pub id: String,
    pub value: f64,
    pub unit: Option<TimeUnit>,
}

/// A box given as corner points, with an optional category tag.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub id: String,
    pub coordinates: Vec<Point>,
    pub box_type: Option<String>,
}

impl BoundingBox {
    /// Whether this box belongs to `category`. Untagged boxes never match.
    pub fn matches(&self, category: &str) -> bool {
        self.box_type.as_deref() == Some(category)
    }
}

/// A directed edge between two qualified identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// A validated annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    TimePoint(TimePoint),
    BoundingBox(BoundingBox),
    Alignment(Alignment),
    Other { id: String, at_type: AnnotationType },
}

impl Record {
    pub fn id(&self) -> &str {
        match self {
            Self::TimePoint(tp) => &tp.id,
            Self::BoundingBox(bb) => &bb.id,
            Self::Alignment(al) => &al.id,
            Self::Other { id, .. } => id,
        }
    }

    pub fn annotation_type(&self) -> AnnotationType {
        match self {
            Self::TimePoint(_) => AnnotationType::TimePoint,
            Self::BoundingBox(_) => AnnotationType::BoundingBox,
            Self::Alignment(_) => AnnotationType::Alignment,
            Self::Other { at_type, .. } => at_type.clone(),
        }
    }

    pub fn as_time_point(&self) -> Option<&TimePoint> {
        match self {
            Self::TimePoint(tp) => Some(tp),
            _ => None,
        }
    }

    pub fn as_bounding_box(&self) -> Option<&BoundingBox> {
        match self {
            Self::BoundingBox(bb) => Some(bb),
            _ => None,
        }
    }
}

impl<'a> TryFrom<AnnotationRef<'a>> for Record {
    type Error = BoxcatError;

    fn try_from(r: AnnotationRef<'a>) -> Result<Self> {
        let id = r
            .qualified_id()
            .ok_or_else(|| BoxcatError::invalid_annotation("<unknown>", "id", "is missing"))?;

        let record = match r.annotation_type() {
            AnnotationType::TimePoint => {
                let value = r
                    .property("timePoint")
                    .and_then(Value::as_f64)
                    .ok_or_else(|| {
                        BoxcatError::invalid_annotation(&id, "timePoint", "must be a number")
                    })?;
                let unit = match r.property("timeUnit") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.parse::<TimeUnit>().map_err(|_| {
                        BoxcatError::invalid_annotation(
                            &id,
                            "timeUnit",
                            format!("has unknown unit {:?}", s),
                        )
                    })?),
                    Some(_) => {
                        return Err(BoxcatError::invalid_annotation(
                            &id,
                            "timeUnit",
                            "must be a string",
                        ));
                    }
                };
                Self::TimePoint(TimePoint { id, value, unit })
            }
            AnnotationType::BoundingBox => {
                let raw = r.property("coordinates").ok_or_else(|| {
                    BoxcatError::invalid_annotation(&id, "coordinates", "is missing")
                })?;
                let coordinates = parse_points(raw).ok_or_else(|| {
                    BoxcatError::invalid_annotation(
                        &id,
                        "coordinates",
                        "must be a list of [x, y] number pairs",
                    )
                })?;
                let box_type = r
                    .property("boxType")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Self::BoundingBox(BoundingBox {
                    id,
                    coordinates,
                    box_type,
                })
            }
            AnnotationType::Alignment => {
                let endpoint = |name: &'static str| -> Result<String> {
                    r.property(name)
                        .and_then(Value::as_str)
                        .map(|target| qualify_id(&r.view.id, target))
                        .ok_or_else(|| BoxcatError::invalid_annotation(&id, name, "must be a string"))
                };
                let source = endpoint("source")?;
                let target = endpoint("target")?;
                Self::Alignment(Alignment { id, source, target })
            }
            at_type => Self::Other { id, at_type },
        };
        Ok(record)
    }
}

fn parse_points(value: &Value) -> Option<Vec<Point>> {
    value
        .as_array()?
        .iter()
        .map(|pair| match pair.as_array()?.as_slice() {
            [x, y] => Some((x.as_f64()?, y.as_f64()?)),
            _ => None,
        })
        .collect()
}

/// Encodes a number, keeping integral values integral.
pub fn number_value(n: f64) -> Value {
    const EXACT_INT: f64 = 9_007_199_254_740_992.0;
    if n.fract() == 0.0 && n.abs() < EXACT_INT {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

/// Encodes a coordinate list as nested `[x, y]` arrays.
pub fn points_value(points: &[Point]) -> Value {
    Value::Array(
        points
            .iter()
            .map(|&(x, y)| Value::Array(vec![number_value(x), number_value(y)]))
            .collect(),
    )
}
