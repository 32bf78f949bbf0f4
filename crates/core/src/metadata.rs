//! App metadata: what the app consumes, produces and accepts.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::model::AnnotationType;
use crate::params::{BOX_TYPE_PARAM, DEFAULT_BOX_TYPE, TIME_UNIT_PARAM, TimeUnit};

/// Identifier stamped on every view this app creates.
pub const APP_IDENTIFIER: &str = "http://apps.clams.ai/boundingbox-concatenation/v0.3.0";

/// Declaration of one runtime parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<&'static str>,
    pub default: Value,
}

/// A type the app reads or writes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IoSpec {
    #[serde(rename = "@type")]
    pub at_type: String,
    pub required: bool,
}

impl IoSpec {
    fn required(ty: AnnotationType) -> Self {
        Self {
            at_type: ty.uri(),
            required: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppMetadata {
    pub name: &'static str,
    pub description: &'static str,
    pub app_version: &'static str,
    pub app_license: &'static str,
    pub identifier: &'static str,
    pub url: &'static str,
    pub input: Vec<IoSpec>,
    pub output: Vec<IoSpec>,
    pub parameters: Vec<ParameterSpec>,
}

impl AppMetadata {
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let s = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(s)
    }
}

/// Metadata of this app.
pub fn app_metadata() -> AppMetadata {
    AppMetadata {
        name: "BoundingBox Concatenation",
        description: "Converts a series of bounding-boxes at a given timepoint into a single bounding box.",
        app_version: env!("CARGO_PKG_VERSION"),
        app_license: "MIT",
        identifier: APP_IDENTIFIER,
        url: "https://github.com/clamsproject/app-boundingbox-concatenation",
        input: vec![
            IoSpec::required(AnnotationType::Document),
            IoSpec::required(AnnotationType::BoundingBox),
            IoSpec::required(AnnotationType::Alignment),
        ],
        output: vec![
            IoSpec::required(AnnotationType::BoundingBox),
            IoSpec::required(AnnotationType::TimePoint),
            IoSpec::required(AnnotationType::Alignment),
        ],
        parameters: vec![
            ParameterSpec {
                name: TIME_UNIT_PARAM,
                description: "the division of time processing",
                kind: "string",
                choices: TimeUnit::ALL.iter().map(|u| u.as_str()).collect(),
                default: Value::String(TimeUnit::default().as_str().to_string()),
            },
            ParameterSpec {
                name: BOX_TYPE_PARAM,
                description: "the type of boxes that are being concatenated",
                kind: "string",
                choices: Vec::new(),
                default: Value::String(DEFAULT_BOX_TYPE.to_string()),
            },
        ],
    }
}
