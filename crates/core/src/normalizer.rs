//! Tolerant extraction of a single image payload from provider output.
//!
//! The provider's `output` field has varied across deployments: sometimes
//! a list of base64 strings, sometimes a list of objects, sometimes a
//! single string, sometimes nested under different key names. Rather than
//! hard-coding one shape, the normalizer classifies the value into one of
//! the known shapes and then applies an ordered list of extraction rules;
//! the first rule that yields a non-empty string wins.

use serde_json::Value;

/// Map keys probed, in order, when the candidate element is an object.
const CANDIDATE_KEYS: &[&str] = &["image", "b64", "base64"];

/// Map keys probed, in order, on a top-level output object.
const CONTAINER_KEYS: &[&str] = &["images", "image"];

/// Errors from payload extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// No non-empty base64 string was found at any stage.
    #[error("no image payload found in provider output")]
    NoPayload,
}

/// Known top-level shapes of the provider's `output` value.
///
/// Classification never fails; anything unrecognized is `Absent`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProviderOutput<'a> {
    /// Object form: image data nested under `images` or `image`.
    Map(&'a serde_json::Map<String, Value>),
    /// List form: the value itself is the candidate list.
    List(&'a [Value]),
    /// A single bare string payload.
    Single(&'a str),
    /// Null, missing, or an unusable scalar.
    Absent,
}

impl<'a> ProviderOutput<'a> {
    /// Classify an arbitrary output value into one of the known shapes.
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => ProviderOutput::Map(map),
            Value::Array(items) => ProviderOutput::List(items),
            Value::String(s) => ProviderOutput::Single(s),
            _ => ProviderOutput::Absent,
        }
    }
}

/// Extract exactly one base64 image string from an arbitrary provider
/// output value.
///
/// Priority order:
/// 1. object → `images` key, else `image` key (list or scalar under it);
/// 2. list → first element;
/// 3. bare string → used directly;
/// 4. an object element is probed for `image`, `b64`, `base64` in order;
/// 5. a `data:` URL prefix is stripped up to and including the first comma.
pub fn extract_image_payload(output: &Value) -> Result<String, NormalizeError> {
    let candidate = first_candidate(output).ok_or(NormalizeError::NoPayload)?;
    let payload = candidate_string(candidate)
        .map(strip_data_url)
        .ok_or(NormalizeError::NoPayload)?;

    if payload.is_empty() {
        return Err(NormalizeError::NoPayload);
    }
    Ok(payload.to_string())
}

/// Select the single candidate element per the priority order.
fn first_candidate(output: &Value) -> Option<&Value> {
    match ProviderOutput::classify(output) {
        ProviderOutput::Map(map) => {
            let container = CONTAINER_KEYS.iter().find_map(|k| map.get(*k))?;
            match container {
                // Structured list-of-images form: take the first element.
                Value::Array(items) => items.first(),
                // Scalar directly under the key, e.g. {"image": "abc"}.
                other => Some(other),
            }
        }
        ProviderOutput::List(items) => items.first(),
        ProviderOutput::Single(_) => Some(output),
        ProviderOutput::Absent => None,
    }
}

/// Resolve a candidate element to a string: strings pass through,
/// objects are probed key by key, everything else is no payload.
fn candidate_string(candidate: &Value) -> Option<&str> {
    match candidate {
        Value::String(s) => Some(s),
        Value::Object(map) => CANDIDATE_KEYS
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str)),
        _ => None,
    }
}

/// Strip a data-URL prefix (`data:image/png;base64,...`) if present.
fn strip_data_url(payload: &str) -> &str {
    if payload.starts_with("data:") {
        match payload.split_once(',') {
            Some((_, rest)) => rest,
            None => payload,
        }
    } else {
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- accepted shapes ------------------------------------------------------

    #[test]
    fn extracts_from_all_known_shapes() {
        let shapes = [
            json!({ "images": ["abc"] }),
            json!({ "images": [{ "image": "abc" }] }),
            json!({ "image": "abc" }),
            json!(["abc"]),
            json!("abc"),
            json!("data:image/png;base64,abc"),
        ];
        for shape in &shapes {
            assert_eq!(
                extract_image_payload(shape).as_deref(),
                Ok("abc"),
                "shape: {shape}"
            );
        }
    }

    #[test]
    fn images_key_takes_priority_over_image() {
        let output = json!({ "images": ["first"], "image": "second" });
        assert_eq!(extract_image_payload(&output).as_deref(), Ok("first"));
    }

    #[test]
    fn object_element_keys_probed_in_order() {
        let output = json!({ "images": [{ "base64": "later", "b64": "sooner" }] });
        assert_eq!(extract_image_payload(&output).as_deref(), Ok("sooner"));
    }

    #[test]
    fn only_first_list_element_is_considered() {
        let output = json!(["one", "two"]);
        assert_eq!(extract_image_payload(&output).as_deref(), Ok("one"));
    }

    #[test]
    fn data_url_prefix_stripped_inside_object_form() {
        let output = json!({ "images": [{ "image": "data:image/png;base64,abc" }] });
        assert_eq!(extract_image_payload(&output).as_deref(), Ok("abc"));
    }

    // -- rejected shapes ------------------------------------------------------

    #[test]
    fn unusable_shapes_yield_no_payload() {
        let shapes = [
            json!({ "images": [] }),
            json!({}),
            json!(null),
            json!([{}]),
            json!(42),
            json!(""),
            json!({ "images": [42] }),
        ];
        for shape in &shapes {
            assert_eq!(
                extract_image_payload(shape),
                Err(NormalizeError::NoPayload),
                "shape: {shape}"
            );
        }
    }

    #[test]
    fn data_url_with_empty_body_is_no_payload() {
        let output = json!("data:image/png;base64,");
        assert_eq!(extract_image_payload(&output), Err(NormalizeError::NoPayload));
    }

    // -- classification -------------------------------------------------------

    #[test]
    fn classify_covers_all_shapes() {
        assert_eq!(
            ProviderOutput::classify(&json!(null)),
            ProviderOutput::Absent
        );
        assert_eq!(
            ProviderOutput::classify(&json!(true)),
            ProviderOutput::Absent
        );
        assert!(matches!(
            ProviderOutput::classify(&json!("x")),
            ProviderOutput::Single("x")
        ));
        assert!(matches!(
            ProviderOutput::classify(&json!([1])),
            ProviderOutput::List(_)
        ));
        assert!(matches!(
            ProviderOutput::classify(&json!({"a": 1})),
            ProviderOutput::Map(_)
        ));
    }
}
