//! Projection of a Plant.id response onto [`IdentificationResult`].
//!
//! The upstream body is untrusted: any link of
//! `result.classification.suggestions[0].details` may be missing, null, empty or
//! of the wrong JSON type. Every such case collapses to the field's default, so
//! this never fails.

use serde_json::{Map, Value};

use crate::models::IdentificationResult;

/// Build the flat result from the top suggestion of an upstream response.
pub fn normalize(response: &Value) -> IdentificationResult {
    let suggestion = top_suggestion(response);
    let details = object_field(suggestion, "details");

    let common_names: Vec<String> = array_field(details, "common_names")
        .iter()
        .filter_map(|name| name.as_str().map(str::to_string))
        .collect();

    IdentificationResult {
        name: common_names.first().cloned(),
        scientific_name: string_field(suggestion, "name"),
        family: string_field(object_field(details, "taxonomy"), "family"),
        probability: suggestion
            .and_then(|s| s.get("probability"))
            .and_then(Value::as_f64),
        common_names,
        wikipedia_url: string_field(details, "url"),
        ..IdentificationResult::default()
    }
}

fn top_suggestion(response: &Value) -> Option<&Map<String, Value>> {
    response
        .pointer("/result/classification/suggestions")
        .and_then(Value::as_array)
        .and_then(|suggestions| suggestions.first())
        .and_then(Value::as_object)
}

fn object_field<'a>(
    object: Option<&'a Map<String, Value>>,
    key: &str,
) -> Option<&'a Map<String, Value>> {
    object?.get(key)?.as_object()
}

fn array_field<'a>(object: Option<&'a Map<String, Value>>, key: &str) -> &'a [Value] {
    object
        .and_then(|o| o.get(key))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn string_field(object: Option<&Map<String, Value>>, key: &str) -> Option<String> {
    object?.get(key)?.as_str().map(str::to_string)
}
