//! Runtime parameters.
//!
//! Contains ConcatParams for controlling what gets concatenated and how the
//! emitted records are stamped.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BoxcatError, Result};

/// Parameter name for the time unit stamped on emitted time points.
pub const TIME_UNIT_PARAM: &str = "timeUnit";

/// Parameter name for the box category filter.
pub const BOX_TYPE_PARAM: &str = "boxType";

/// Default box category.
pub const DEFAULT_BOX_TYPE: &str = "text";

/// The division of time a time point value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Frames,
    Seconds,
    Milliseconds,
}

impl TimeUnit {
    /// All accepted units, in declaration order.
    pub const ALL: [Self; 3] = [Self::Frames, Self::Seconds, Self::Milliseconds];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Frames => "frames",
            Self::Seconds => "seconds",
            Self::Milliseconds => "milliseconds",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = BoxcatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.as_str() == s)
            .ok_or_else(|| BoxcatError::InvalidParameter {
                name: TIME_UNIT_PARAM.to_string(),
                msg: format!(
                    "expected one of frames, seconds, milliseconds, got {:?}",
                    s
                ),
            })
    }
}

/// Parameters for one concatenation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatParams {
    /// Unit stamped on every emitted time point.
    pub time_unit: TimeUnit,

    /// Only boxes whose category equals this take part. The emitted boxes
    /// carry the same category.
    pub box_type: String,
}

impl Default for ConcatParams {
    fn default() -> Self {
        Self {
            time_unit: TimeUnit::default(),
            box_type: DEFAULT_BOX_TYPE.to_string(),
        }
    }
}

impl ConcatParams {
    pub fn new(time_unit: TimeUnit, box_type: impl Into<String>) -> Self {
        Self {
            time_unit,
            box_type: box_type.into(),
        }
    }

    /// Builds parameters from a `name -> values` map as delivered by a query
    /// string.
    ///
    /// The first value of each recognized name wins. Unrecognized names are
    /// ignored so that service-wide parameters can pass through.
    pub fn from_parameters(parameters: &IndexMap<String, Vec<String>>) -> Result<Self> {
        let mut params = Self::default();
        if let Some(value) = first_value(parameters, TIME_UNIT_PARAM) {
            params.time_unit = value.parse()?;
        }
        if let Some(value) = first_value(parameters, BOX_TYPE_PARAM) {
            if value.is_empty() {
                return Err(BoxcatError::InvalidParameter {
                    name: BOX_TYPE_PARAM.to_string(),
                    msg: "must not be empty".to_string(),
                });
            }
            params.box_type = value.to_string();
        }
        Ok(params)
    }

    /// The resolved parameters in the form recorded on a view.
    pub fn to_json(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            TIME_UNIT_PARAM.to_string(),
            Value::String(self.time_unit.as_str().to_string()),
        );
        map.insert(
            BOX_TYPE_PARAM.to_string(),
            Value::String(self.box_type.clone()),
        );
        map
    }
}

fn first_value<'a>(parameters: &'a IndexMap<String, Vec<String>>, name: &str) -> Option<&'a str> {
    parameters
        .get(name)
        .and_then(|values| values.first())
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_unit_round_trips_through_str() {
        for unit in TimeUnit::ALL {
            assert_eq!(unit.as_str().parse::<TimeUnit>().unwrap(), unit);
        }
    }

    #[test]
    fn test_time_unit_rejects_unknown() {
        let err = "hours".parse::<TimeUnit>().unwrap_err();
        assert!(matches!(err, BoxcatError::InvalidParameter { ref name, .. } if name == "timeUnit"));
    }
}
