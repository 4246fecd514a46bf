//! Persisted per-command state.
//!
//! A [`CommandState`] is an ordered map from field name to a JSON value. It
//! serializes as a flat JSON object with sorted keys, so the text written for
//! a given state is always the same.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConsoleError, Result};

/// Named fields a command wants saved between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandState {
    fields: BTreeMap<String, Value>,
}

impl CommandState {
    /// Create an empty state bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a serializable default.
    pub fn with<T: Serialize>(mut self, key: &str, value: T) -> Result<Self> {
        self.set(key, value)?;
        Ok(self)
    }

    /// Raw JSON value of a field.
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Deserialize a field into `T`. Returns `None` when the field is
    /// missing or holds a value of another shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.fields
            .get(key)
            .and_then(|v| T::deserialize(v).ok())
    }

    /// Serialize `value` into field `key`, replacing any previous value.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.fields.insert(key.to_string(), value);
        Ok(())
    }

    /// Insert an already-built JSON value.
    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        self.fields.insert(key.to_string(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Overwrite matching keys with the values from `other`. Keys only
    /// present in `other` are added; keys only present here are kept.
    pub fn merge(&mut self, other: CommandState) {
        self.fields.extend(other.fields);
    }

    /// Compact JSON object text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.fields)?)
    }

    /// Parse JSON object text. Anything other than an object is rejected.
    pub fn from_json(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => Ok(Self {
                fields: map.into_iter().collect(),
            }),
            other => Err(ConsoleError::InvalidState(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_get_and_set() {
        let mut state = CommandState::new();
        state.set("points", 5_i64).unwrap();
        state.set("name", "alice").unwrap();
        assert_eq!(state.get::<i64>("points"), Some(5));
        assert_eq!(state.get::<String>("name").as_deref(), Some("alice"));
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn get_wrong_shape_is_none() {
        let state = CommandState::new().with("points", "five").unwrap();
        assert_eq!(state.get::<i64>("points"), None);
        assert_eq!(state.get::<i64>("missing"), None);
    }

    #[test]
    fn merge_overwrites_matching_keys_and_keeps_others() {
        let mut live = CommandState::new()
            .with("points", 0)
            .unwrap()
            .with("level", 1)
            .unwrap();
        let saved = CommandState::new()
            .with("points", 5)
            .unwrap()
            .with("badge", "gold")
            .unwrap();
        live.merge(saved);
        assert_eq!(live.get::<i64>("points"), Some(5));
        assert_eq!(live.get::<i64>("level"), Some(1));
        assert_eq!(live.get::<String>("badge").as_deref(), Some("gold"));
    }

    #[test]
    fn json_is_flat_object_with_sorted_keys() {
        let state = CommandState::new()
            .with("zeta", true)
            .unwrap()
            .with("alpha", json!([1, 2]))
            .unwrap();
        assert_eq!(state.to_json().unwrap(), r#"{"alpha":[1,2],"zeta":true}"#);
    }

    #[test]
    fn from_json_rejects_non_object() {
        let err = CommandState::from_json("[1, 2, 3]").unwrap_err();
        assert!(format!("{err}").contains("an array"));
        assert!(CommandState::from_json("not json").is_err());
    }

    #[test]
    fn from_json_reads_nested_values() {
        let state = CommandState::from_json(r#"{"points": 5, "tags": {"a": null}}"#).unwrap();
        assert_eq!(state.get::<u32>("points"), Some(5));
        assert_eq!(state.get_raw("tags"), Some(&json!({"a": null})));
    }

    #[test]
    fn remove_and_contains() {
        let mut state = CommandState::new().with("k", 1).unwrap();
        assert!(state.contains_key("k"));
        assert_eq!(state.remove("k"), Some(json!(1)));
        assert!(state.is_empty());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        fn arb_value() -> impl Strategy<Value = Value> {
            let leaf = prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::Bool),
                any::<i64>().prop_map(|n| json!(n)),
                "[a-z0-9 ]{0,12}".prop_map(Value::String),
            ];
            leaf.prop_recursive(3, 16, 4, |inner| {
                prop_oneof![
                    proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                    proptest::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                        .prop_map(|m| Value::Object(m.into_iter().collect())),
                ]
            })
        }

        proptest! {
            #[test]
            fn json_text_round_trips(
                fields in proptest::collection::btree_map("[a-z_]{1,10}", arb_value(), 0..8)
            ) {
                let mut state = CommandState::new();
                for (k, v) in &fields {
                    state.insert(k, v.clone());
                }
                let text = state.to_json().unwrap();
                let back = CommandState::from_json(&text).unwrap();
                prop_assert_eq!(back, state);
            }
        }
    }
}
