//! Schema checks for JSON objects recovered from model replies.
//!
//! Mandatory fields must be present with the right primitive type; optional
//! fields are passed through when they have a usable type and dropped
//! otherwise.

use hairscan_core::{AdviceResult, AnalysisResult, Error, Result};
use serde_json::{Map, Value};
use tracing::debug;

/// Validate and convert an extracted object into an [`AnalysisResult`].
pub fn parse_analysis(object: &Map<String, Value>) -> Result<AnalysisResult> {
    let density_score = number_field(object, "density_score")?;
    let scalp_exposure_percent = number_field(object, "scalp_exposure_percent")?;
    let parting_width_px = number_field(object, "parting_width_px")?;
    let baby_hairs_visible = bool_field(object, "baby_hairs_visible")?;
    let raw_stage = integer_field(object, "stage")?;

    Ok(AnalysisResult {
        density_score,
        scalp_exposure_percent,
        parting_width_px,
        baby_hairs_visible,
        raw_stage,
        hairline_stability: optional_field(object, "hairline_stability", Value::as_bool),
        left_right_symmetry: optional_field(object, "left_right_symmetry", |v| {
            v.as_str().map(str::to_string)
        }),
    })
}

/// Validate and convert an extracted object into an [`AdviceResult`].
pub fn parse_advice(object: &Map<String, Value>) -> Result<AdviceResult> {
    Ok(AdviceResult {
        summary: string_field(object, "summary")?,
        advice: string_field(object, "advice")?,
    })
}

fn field<'a>(object: &'a Map<String, Value>, name: &str) -> Result<&'a Value> {
    match object.get(name) {
        Some(Value::Null) | None => Err(Error::schema(name, "missing")),
        Some(value) => Ok(value),
    }
}

fn number_field(object: &Map<String, Value>, name: &str) -> Result<f64> {
    let value = field(object, name)?;
    value
        .as_f64()
        .ok_or_else(|| Error::schema(name, format!("expected number, got {}", type_name(value))))
}

fn integer_field(object: &Map<String, Value>, name: &str) -> Result<i64> {
    let value = number_field(object, name)?;
    if value.fract() != 0.0 {
        return Err(Error::schema(
            name,
            format!("expected an integer, got {}", value),
        ));
    }
    Ok(value as i64)
}

fn bool_field(object: &Map<String, Value>, name: &str) -> Result<bool> {
    let value = field(object, name)?;
    value
        .as_bool()
        .ok_or_else(|| Error::schema(name, format!("expected boolean, got {}", type_name(value))))
}

fn string_field(object: &Map<String, Value>, name: &str) -> Result<String> {
    let value = field(object, name)?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::schema(name, format!("expected string, got {}", type_name(value))))
}

/// Read an optional field, dropping it with a debug log when the type is wrong.
fn optional_field<T>(
    object: &Map<String, Value>,
    name: &str,
    convert: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = object.get(name).filter(|v| !v.is_null())?;
    let converted = convert(value);
    if converted.is_none() {
        debug!(
            subsystem = "inference",
            component = "schema",
            field = name,
            got = type_name(value),
            "Dropping optional field with unexpected type"
        );
    }
    converted
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
