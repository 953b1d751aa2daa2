//! Loosely-typed action records
//!
//! Tools outside the core exchange actions as JSON objects with a one-letter
//! `kind` tag. [`ActionRecord`] is that shape; converting it into an
//! [`Action`] is where unknown kinds and missing payloads are caught.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, TreeLogError};
use crate::model::{Action, ActionId, ActionKind, Content};
use crate::ops::ActionLog;

/// Wire shape of one action
///
/// `content` is base64 in JSON and only present on `c` and `o` records;
/// `to` is only present on `r` records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: u64,
    #[serde(default)]
    pub parent: u64,
    pub kind: String,
    pub path: String,
    #[serde(
        default,
        with = "base64_bytes",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl Action {
    /// Parse a JSON record and decode it into an action
    ///
    /// # Errors
    /// * `Serialization` - the text is not a JSON record
    /// * `UnknownAction` / `MalformedAction` - the record does not decode
    ///
    /// # Example
    /// ```
    /// use treelog_core::Action;
    ///
    /// let action = Action::from_json(r#"{"id": 3, "kind": "r", "path": "a", "to": "b"}"#).unwrap();
    /// assert_eq!(action.destination(), Some("b"));
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let record: ActionRecord = serde_json::from_str(json)?;
        Action::try_from(record)
    }
}

/// Check whether a JSON value has the shape of an action
///
/// Only the envelope is checked: a numeric `id`, a string `path` and a
/// known `kind`. Payload fields are validated by decoding.
///
/// # Example
/// ```
/// use serde_json::json;
/// use treelog_core::record::is_action;
///
/// assert!(is_action(&json!({ "id": 3, "kind": "d", "path": "a.txt" })));
/// assert!(!is_action(&json!({ "id": 3, "kind": "x", "path": "a.txt" })));
/// ```
pub fn is_action(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    let id_ok = obj.get("id").is_some_and(Value::is_number);
    let path_ok = obj.get("path").is_some_and(Value::is_string);
    let kind_ok = obj
        .get("kind")
        .and_then(Value::as_str)
        .is_some_and(|k| matches!(k, "c" | "o" | "r" | "d"));
    id_ok && path_ok && kind_ok
}

impl TryFrom<ActionRecord> for Action {
    type Error = TreeLogError;

    fn try_from(record: ActionRecord) -> Result<Self> {
        if record.id == ActionId::NONE.get() {
            return Err(TreeLogError::MalformedAction {
                reason: "action id 0 is reserved".to_string(),
            });
        }

        let kind = match record.kind.as_str() {
            "c" => ActionKind::Create {
                content: require_content(record.content, "c")?,
            },
            "o" => ActionKind::Overwrite {
                content: require_content(record.content, "o")?,
            },
            "r" => ActionKind::Rename {
                to: record.to.ok_or_else(|| TreeLogError::MalformedAction {
                    reason: "rename record has no 'to'".to_string(),
                })?,
            },
            "d" => ActionKind::Delete,
            _ => return Err(TreeLogError::UnknownAction { kind: record.kind }),
        };

        Ok(Action::new(
            ActionId::new(record.id),
            ActionId::new(record.parent),
            record.path,
            kind,
        ))
    }
}

fn require_content(content: Option<Vec<u8>>, tag: &str) -> Result<Content> {
    content
        .map(Content::from)
        .ok_or_else(|| TreeLogError::MalformedAction {
            reason: format!("'{}' record has no content", tag),
        })
}

impl From<&Action> for ActionRecord {
    fn from(action: &Action) -> Self {
        Self {
            id: action.id().get(),
            parent: action.parent().get(),
            kind: action.kind().tag().to_string(),
            path: action.path().to_string(),
            content: action.content().map(|c| c.as_bytes().to_vec()),
            to: action.destination().map(str::to_string),
        }
    }
}

impl ActionLog {
    /// Rebuild a log from records, keeping their ids and parents
    ///
    /// The log gets a private allocator advanced past the highest id.
    ///
    /// # Errors
    /// * `UnknownAction` / `MalformedAction` - a record does not decode
    /// * `ActionOutOfOrder` - ids are not strictly increasing
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = ActionRecord>,
    {
        let mut log = ActionLog::new();
        for record in records {
            log.push(Action::try_from(record)?)?;
        }
        Ok(log)
    }

    pub fn to_records(&self) -> Vec<ActionRecord> {
        self.iter().map(ActionRecord::from).collect()
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match bytes {
            Some(b) => serializer.serialize_some(&STANDARD.encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| STANDARD.decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(kind: &str) -> ActionRecord {
        ActionRecord {
            id: 4,
            parent: 3,
            kind: kind.to_string(),
            path: "a.txt".to_string(),
            content: None,
            to: None,
        }
    }

    #[test]
    fn test_is_action_requires_envelope() {
        assert!(is_action(&json!({ "id": 1, "kind": "c", "path": "a" })));
        assert!(!is_action(&json!({ "id": "1", "kind": "c", "path": "a" })));
        assert!(!is_action(&json!({ "id": 1, "kind": "c" })));
        assert!(!is_action(&json!({ "id": 1, "path": "a" })));
        assert!(!is_action(&json!([1, "c", "a"])));
    }

    #[test]
    fn test_unknown_kind() {
        let err = Action::try_from(record("x")).unwrap_err();
        assert_eq!(
            err,
            TreeLogError::UnknownAction {
                kind: "x".to_string()
            }
        );
    }

    #[test]
    fn test_create_without_content_is_malformed() {
        let err = Action::try_from(record("c")).unwrap_err();
        assert!(matches!(err, TreeLogError::MalformedAction { .. }));
    }

    #[test]
    fn test_rename_without_destination_is_malformed() {
        let err = Action::try_from(record("r")).unwrap_err();
        assert!(matches!(err, TreeLogError::MalformedAction { .. }));
    }

    #[test]
    fn test_reserved_id_is_malformed() {
        let mut r = record("d");
        r.id = 0;
        assert!(matches!(
            Action::try_from(r),
            Err(TreeLogError::MalformedAction { .. })
        ));
    }

    #[test]
    fn test_decodes_rename() {
        let mut r = record("r");
        r.to = Some("b.txt".to_string());

        let action = Action::try_from(r).unwrap();
        assert_eq!(action.id(), ActionId::new(4));
        assert_eq!(action.parent(), ActionId::new(3));
        assert_eq!(action.destination(), Some("b.txt"));
    }

    #[test]
    fn test_content_is_base64_in_json() {
        let mut r = record("o");
        r.content = Some(b"hi".to_vec());

        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["content"], json!("aGk="));
        assert!(value.get("to").is_none());
    }

    #[test]
    fn test_from_json_bad_base64() {
        let err =
            Action::from_json(r#"{"id": 1, "kind": "c", "path": "a", "content": "***"}"#)
                .unwrap_err();
        assert!(matches!(err, TreeLogError::Serialization { .. }));
    }
}
