//! JSON configuration merging
//!
//! The default merge semantics for driver config fragments: objects merge
//! recursively with later values winning key conflicts, while scalars and
//! arrays are replaced wholesale by the later fragment. Drivers with
//! tool-specific rules override `DriverAdapter::merge_config` instead of
//! this function.

use serde_json::Value as JsonValue;

/// Deep-merge `next` over `prev`, consuming both and returning the merged
/// value.
///
/// - Objects: recursively merge keys, `next` winning conflicts.
/// - Everything else (scalars, arrays, null): `next` replaces `prev`.
pub fn deep_merge(prev: JsonValue, next: JsonValue) -> JsonValue {
    match (prev, next) {
        (JsonValue::Object(mut prev_map), JsonValue::Object(next_map)) => {
            for (key, next_value) in next_map {
                match prev_map.remove(&key) {
                    Some(prev_value) => {
                        prev_map.insert(key, deep_merge(prev_value, next_value));
                    }
                    None => {
                        prev_map.insert(key, next_value);
                    }
                }
            }
            JsonValue::Object(prev_map)
        }
        (_, next) => next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_disjoint_objects() {
        let merged = deep_merge(json!({"a": 1}), json!({"b": 2}));
        assert_eq!(merged, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_merge_nested_objects_recursively() {
        let merged = deep_merge(
            json!({"rules": {"no-console": "warn", "semi": "error"}}),
            json!({"rules": {"no-console": "error"}}),
        );
        assert_eq!(
            merged,
            json!({"rules": {"no-console": "error", "semi": "error"}})
        );
    }

    #[test]
    fn test_scalars_last_writer_wins() {
        assert_eq!(deep_merge(json!("old"), json!("new")), json!("new"));
        assert_eq!(deep_merge(json!(1), json!(2)), json!(2));
        assert_eq!(deep_merge(json!(true), json!(false)), json!(false));
    }

    #[test]
    fn test_arrays_replaced_not_concatenated() {
        let merged = deep_merge(json!({"ignore": ["a", "b"]}), json!({"ignore": ["c"]}));
        assert_eq!(merged, json!({"ignore": ["c"]}));
    }

    #[test]
    fn test_object_replaces_scalar() {
        let merged = deep_merge(json!({"env": "node"}), json!({"env": {"node": true}}));
        assert_eq!(merged, json!({"env": {"node": true}}));
    }

    #[test]
    fn test_merge_with_empty_object_is_identity() {
        let config = json!({"rules": {"semi": "error"}});
        assert_eq!(deep_merge(config.clone(), json!({})), config);
        assert_eq!(deep_merge(json!({}), config.clone()), config);
    }
}
