//! JSON containment and equality used by the body expectations.
//!
//! Paths in diffs use a `$.field[0].nested` notation rooted at `$`.

use serde_json::{Number, Value};

/// First point where an actual document departs from the expected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonDiff {
    /// Location of the difference.
    pub path: String,
    /// What went wrong at `path`.
    pub reason: String,
    /// Rendering of the expected value.
    pub expected: String,
    /// Rendering of the actual value, if one exists.
    pub actual: Option<String>,
}

impl JsonDiff {
    fn new(path: &str, reason: impl Into<String>, expected: &Value, actual: Option<&Value>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
            expected: expected.to_string(),
            actual: actual.map(Value::to_string),
        }
    }
}

/// Checks that `actual` contains `template`.
///
/// - object template vs object: every templated field must be present and match
/// - object template vs array: every array item must match the template
/// - array template vs array: every template element must match some item
/// - scalars compare by value, numbers numerically
///
/// # Errors
///
/// Returns the first [`JsonDiff`] found.
pub fn contains(actual: &Value, template: &Value) -> Result<(), JsonDiff> {
    contains_at(actual, template, "$")
}

fn contains_at(actual: &Value, template: &Value, path: &str) -> Result<(), JsonDiff> {
    match (template, actual) {
        (Value::Object(fields), Value::Object(actual_fields)) => {
            for (key, expected) in fields {
                let child = format!("{path}.{key}");
                match actual_fields.get(key) {
                    Some(value) => contains_at(value, expected, &child)?,
                    None => return Err(JsonDiff::new(&child, "field is missing", expected, None)),
                }
            }
            Ok(())
        }
        (Value::Object(_), Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                contains_at(item, template, &format!("{path}[{index}]"))?;
            }
            Ok(())
        }
        (Value::Array(elements), Value::Array(items)) => {
            for (index, element) in elements.iter().enumerate() {
                if !items.iter().any(|item| contains_at(item, element, path).is_ok()) {
                    return Err(JsonDiff::new(
                        path,
                        format!("no array item matches template element {index}"),
                        element,
                        Some(actual),
                    ));
                }
            }
            Ok(())
        }
        _ => scalar_eq(actual, template, path),
    }
}

/// Checks that `actual` and `expected` are structurally identical.
///
/// # Errors
///
/// Returns the first [`JsonDiff`] found.
pub fn equals(actual: &Value, expected: &Value) -> Result<(), JsonDiff> {
    equals_at(actual, expected, "$")
}

fn equals_at(actual: &Value, expected: &Value, path: &str) -> Result<(), JsonDiff> {
    match (expected, actual) {
        (Value::Object(fields), Value::Object(actual_fields)) => {
            for (key, value) in fields {
                let child = format!("{path}.{key}");
                match actual_fields.get(key) {
                    Some(actual_value) => equals_at(actual_value, value, &child)?,
                    None => return Err(JsonDiff::new(&child, "field is missing", value, None)),
                }
            }
            if let Some((key, value)) = actual_fields.iter().find(|(k, _)| !fields.contains_key(*k)) {
                return Err(JsonDiff::new(
                    &format!("{path}.{key}"),
                    "unexpected field",
                    &Value::Null,
                    Some(value),
                ));
            }
            Ok(())
        }
        (Value::Array(elements), Value::Array(items)) => {
            if elements.len() != items.len() {
                return Err(JsonDiff::new(
                    path,
                    format!("expected {} items, got {}", elements.len(), items.len()),
                    expected,
                    Some(actual),
                ));
            }
            for (index, (element, item)) in elements.iter().zip(items).enumerate() {
                equals_at(item, element, &format!("{path}[{index}]"))?;
            }
            Ok(())
        }
        _ => scalar_eq(actual, expected, path),
    }
}

fn scalar_eq(actual: &Value, expected: &Value, path: &str) -> Result<(), JsonDiff> {
    let equal = match (expected, actual) {
        (Value::Number(a), Value::Number(b)) => numbers_eq(a, b),
        _ => expected == actual,
    };
    if equal {
        Ok(())
    } else {
        Err(JsonDiff::new(path, "value differs", expected, Some(actual)))
    }
}

#[allow(clippy::float_cmp)]
fn numbers_eq(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_contains_ignores_extra_fields() {
        let actual = json!({"id": 9999, "name": "TestPet", "status": "available", "tags": []});
        assert!(contains(&actual, &json!({"name": "TestPet", "status": "available"})).is_ok());
    }

    #[test]
    fn test_contains_reports_missing_field() {
        let actual = json!({"name": "TestPet"});
        let diff = contains(&actual, &json!({"status": "sold"})).unwrap_err();
        assert_eq!(diff.path, "$.status");
        assert_eq!(diff.reason, "field is missing");
        assert_eq!(diff.actual, None);
    }

    #[test]
    fn test_contains_nested_objects() {
        let actual = json!({"category": {"id": 1, "name": "Dogs"}, "name": "Rex"});
        assert!(contains(&actual, &json!({"category": {"name": "Dogs"}})).is_ok());

        let diff = contains(&actual, &json!({"category": {"name": "Cats"}})).unwrap_err();
        assert_eq!(diff.path, "$.category.name");
        assert_eq!(diff.expected, r#""Cats""#);
        assert_eq!(diff.actual.as_deref(), Some(r#""Dogs""#));
    }

    #[test]
    fn test_contains_numbers_by_value() {
        assert!(contains(&json!({"id": 1.0}), &json!({"id": 1})).is_ok());
        assert!(contains(&json!({"id": 2}), &json!({"id": 1})).is_err());
    }

    #[test]
    fn test_array_template_matches_any_item() {
        let actual = json!([
            {"id": 1, "status": "available"},
            {"id": 2, "status": "sold"}
        ]);
        assert!(contains(&actual, &json!([{"status": "sold"}, {"id": 1}])).is_ok());

        let diff = contains(&actual, &json!([{"status": "pending"}])).unwrap_err();
        assert_eq!(diff.path, "$");
        assert_eq!(diff.reason, "no array item matches template element 0");
    }

    #[test]
    fn test_object_template_against_array_checks_every_item() {
        let all_available = json!([
            {"id": 1, "status": "available"},
            {"id": 2, "status": "available"}
        ]);
        assert!(contains(&all_available, &json!({"status": "available"})).is_ok());

        let mixed = json!([
            {"id": 1, "status": "available"},
            {"id": 2, "status": "sold"}
        ]);
        let diff = contains(&mixed, &json!({"status": "available"})).unwrap_err();
        assert_eq!(diff.path, "$[1].status");

        assert!(contains(&json!([]), &json!({"status": "available"})).is_ok());
    }

    #[test]
    fn test_contains_is_reflexive() {
        let documents = [
            json!({"id": 1, "tags": [{"name": "a"}, {"name": "b"}], "category": {"id": 2}}),
            json!([1, "two", null, {"three": [3]}]),
            json!("plain"),
            json!(null),
        ];
        for document in &documents {
            assert!(contains(document, document).is_ok(), "{document}");
        }
    }

    #[test]
    fn test_contains_is_monotonic_in_actual_fields() {
        let template = json!({"name": "TestPet"});
        let mut actual = json!({"name": "TestPet"});
        assert!(contains(&actual, &template).is_ok());

        actual["status"] = json!("available");
        actual["photoUrls"] = json!(["x"]);
        assert!(contains(&actual, &template).is_ok());
    }

    #[test]
    fn test_removing_templated_field_keeps_failure() {
        let template = json!({"name": "TestPet", "status": "sold", "category": {"id": 1}});
        let mut actual = json!({"name": "TestPet", "status": "available", "category": {"id": 2}});
        assert!(contains(&actual, &template).is_err());

        for field in ["status", "category", "name"] {
            actual.as_object_mut().unwrap().remove(field);
            assert!(contains(&actual, &template).is_err(), "after removing {field}");
        }

        let diff = contains(&json!({}), &template).unwrap_err();
        assert_eq!(diff.reason, "field is missing");
    }

    #[test]
    fn test_equals_exact_empty_list() {
        assert!(equals(&json!([]), &json!([])).is_ok());

        let diff = equals(&json!([{"id": 1}]), &json!([])).unwrap_err();
        assert_eq!(diff.reason, "expected 0 items, got 1");
    }

    #[test]
    fn test_equals_rejects_extra_and_missing_fields() {
        let diff = equals(&json!({"a": 1, "b": 2}), &json!({"a": 1})).unwrap_err();
        assert_eq!(diff.path, "$.b");
        assert_eq!(diff.reason, "unexpected field");

        let diff = equals(&json!({"a": 1}), &json!({"a": 1, "b": 2})).unwrap_err();
        assert_eq!(diff.path, "$.b");
        assert_eq!(diff.reason, "field is missing");
    }

    #[test]
    fn test_equals_is_index_aligned() {
        assert!(equals(&json!([1, 2]), &json!([1, 2])).is_ok());
        let diff = equals(&json!([2, 1]), &json!([1, 2])).unwrap_err();
        assert_eq!(diff.path, "$[0]");
    }
}
