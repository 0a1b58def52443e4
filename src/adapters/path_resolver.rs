//! Segment-by-segment resolution of URL paths against a JSON tree
//!
//! A segment applied to an array selects the element whose `id` has the same
//! string form; applied to an object it selects the field of that name.

use serde_json::Value;
use tracing::debug;

use crate::adapters::route_generator::normalize_prefix;
use crate::domain::RequestParams;

/// String form used to compare ids with URL segments.
///
/// `1`, `1.0` and `"1"` all compare equal to the segment `1`.
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", f as i64)),
                    _ => Some(n.to_string()),
                }
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Whether `element` carries an `id` whose string form equals `id`
pub fn has_id(element: &Value, id: &str) -> bool {
    element
        .get("id")
        .and_then(id_string)
        .is_some_and(|candidate| candidate == id)
}

/// Index of the collection element with the given id
pub fn position_by_id(collection: &[Value], id: &str) -> Option<usize> {
    collection.iter().position(|element| has_id(element, id))
}

/// Turn a URL template into resolvable segments.
///
/// The prefix is stripped, `{name}` placeholders are replaced with their
/// parameter values, and empty segments are dropped.
pub fn path_segments(url: &str, prefix: &str, params: &RequestParams) -> Vec<String> {
    let prefix = normalize_prefix(prefix);
    let relative = url.strip_prefix(prefix).unwrap_or(url);

    relative
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| substitute(segment, params))
        .collect()
}

/// Fill the `{name}` placeholders of one segment, left to right.
/// Substituted values are never rescanned; unknown names stay as written.
fn substitute(segment: &str, params: &RequestParams) -> String {
    let mut resolved = String::with_capacity(segment.len());
    let mut rest = segment;

    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let end = start + len;
        resolved.push_str(&rest[..start]);
        match params.get(&rest[start + 1..end]) {
            Some(value) => resolved.push_str(value),
            None => resolved.push_str(&rest[start..=end]),
        }
        rest = &rest[end + 1..];
    }

    resolved.push_str(rest);
    resolved
}

/// Descend into `root` following `segments`
pub fn resolve<'a>(segments: &[String], root: &'a Value) -> Option<&'a Value> {
    let mut current = root;
    for segment in segments {
        current = match current {
            Value::Array(items) => items.iter().find(|el| has_id(el, segment))?,
            Value::Object(fields) => fields.get(segment)?,
            _ => {
                debug!(segment = %segment, "Path resolution stopped on a scalar");
                return None;
            }
        };
    }
    Some(current)
}

/// Mutable twin of [`resolve`], used by handlers that modify the document
pub fn resolve_mut<'a>(segments: &[String], root: &'a mut Value) -> Option<&'a mut Value> {
    let mut current = root;
    for segment in segments {
        current = match current {
            Value::Array(items) => items.iter_mut().find(|el| has_id(el, segment))?,
            Value::Object(fields) => fields.get_mut(segment)?,
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn segs(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    fn params(pairs: &[(&str, &str)]) -> RequestParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_path_segments_strips_prefix_and_substitutes() {
        let segments = path_segments("/api/v1/users/{id}", "/api/v1/", &params(&[("id", "42")]));
        assert_eq!(segments, segs(&["users", "42"]));
    }

    #[test]
    fn test_path_segments_root() {
        assert!(path_segments("/api/v1", "/api/v1", &RequestParams::new()).is_empty());
    }

    #[test]
    fn test_path_segments_keeps_unknown_placeholder() {
        let segments = path_segments("/api/users/{id}", "/api", &RequestParams::new());
        assert_eq!(segments, segs(&["users", "{id}"]));
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let params = params(&[("id", "{name}"), ("name", "ana")]);
        for _ in 0..16 {
            let segments = path_segments("/api/users/{id}/{name}", "/api", &params);
            assert_eq!(segments, segs(&["users", "{name}", "ana"]));
        }
    }

    #[test]
    fn test_substitute_within_segment() {
        let params = params(&[("a", "x"), ("b", "y")]);
        assert_eq!(substitute("{a}-{b}-{c}", &params), "x-y-{c}");
        assert_eq!(substitute("open{a", &params), "open{a");
    }

    #[test]
    fn test_resolve_object_and_collection() {
        let doc = json!({
            "users": [
                { "id": 1, "name": "Ana", "address": { "city": "Lyon" } },
                { "id": "b7", "name": "Bob" }
            ]
        });

        assert_eq!(
            resolve(&segs(&["users", "1", "address", "city"]), &doc),
            Some(&json!("Lyon"))
        );
        assert_eq!(
            resolve(&segs(&["users", "b7", "name"]), &doc),
            Some(&json!("Bob"))
        );
        assert_eq!(resolve(&segs(&[]), &doc), Some(&doc));
    }

    #[test]
    fn test_resolve_not_found() {
        let doc = json!({ "users": [{ "id": 1 }], "count": 3, "nothing": null });

        assert!(resolve(&segs(&["posts"]), &doc).is_none());
        assert!(resolve(&segs(&["users", "2"]), &doc).is_none());
        assert!(resolve(&segs(&["count", "x"]), &doc).is_none());
        assert!(resolve(&segs(&["nothing", "x"]), &doc).is_none());
    }

    #[test]
    fn test_id_comparison_is_string_based() {
        let doc = json!([{ "id": 1 }, { "id": "2" }, { "id": 3.0 }, { "name": "no id" }]);

        assert!(resolve(&segs(&["1"]), &doc).is_some());
        assert!(resolve(&segs(&["2"]), &doc).is_some());
        assert!(resolve(&segs(&["3"]), &doc).is_some());
        assert!(resolve(&segs(&["undefined"]), &doc).is_none());
    }

    #[test]
    fn test_resolve_mut_allows_in_place_edit() {
        let mut doc = json!({ "users": [{ "id": 1, "name": "Ana" }] });

        let user = resolve_mut(&segs(&["users", "1"]), &mut doc).unwrap();
        user["name"] = json!("Bob");
        assert_eq!(doc["users"][0]["name"], "Bob");
    }

    #[test]
    fn test_id_string() {
        assert_eq!(id_string(&json!(5)), Some("5".to_string()));
        assert_eq!(id_string(&json!(2.5)), Some("2.5".to_string()));
        assert_eq!(id_string(&json!(true)), Some("true".to_string()));
        assert_eq!(id_string(&json!({})), None);
    }
}
