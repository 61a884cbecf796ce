//! Argument shaping ("clean").
//!
//! Mutation arguments arrive flat (`{ id, name, notes, position, tags }`).
//! The store expects nested write directives instead:
//!
//! - `id` is dropped (it addresses the row, it is not data),
//! - `steps` / `notes` become `{ set: [...] }` (replace the whole list),
//! - `position` / `startPosition` / `endPosition` become `{ connect: { id } }`,
//! - `tags` becomes `{ connect: [{ id }, ...], disconnect: [...] }`,
//! - everything else is passed through as a plain value.
//!
//! `null` arguments are treated as absent so a partial update only touches
//! the fields the caller sent.

use crate::error::{RoteiroError, RoteiroResult};
use crate::model::EntityKind;
use crate::relation::RelationDiff;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const LIST_FIELDS: &[&str] = &["steps", "notes"];
const POSITION_FIELDS: &[&str] = &["position", "startPosition", "endPosition"];
const TAGS_FIELD: &str = "tags";
const USER_FIELD: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub id: String,
}

impl Reference {
    fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// One field of a create/update payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldWrite {
    Set {
        set: Vec<String>,
    },
    Connect {
        connect: Reference,
    },
    Relation {
        connect: Vec<Reference>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        disconnect: Vec<Reference>,
    },
    Value(Value),
}

/// Shaped create/update payload, keyed by GraphQL argument name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WriteData {
    fields: BTreeMap<String, FieldWrite>,
}

/// Shapes raw mutation arguments (a JSON object) into [`WriteData`].
pub fn clean(args: Value) -> RoteiroResult<WriteData> {
    let Value::Object(map) = args else {
        return Err(RoteiroError::invalid_input("arguments must be an object"));
    };
    clean_map(map)
}

fn clean_map(mut map: Map<String, Value>) -> RoteiroResult<WriteData> {
    map.remove("id");

    let mut fields = BTreeMap::new();
    for (key, value) in map {
        if value.is_null() {
            continue;
        }
        let write = if LIST_FIELDS.contains(&key.as_str()) {
            FieldWrite::Set {
                set: string_list(&key, value)?,
            }
        } else if POSITION_FIELDS.contains(&key.as_str()) {
            FieldWrite::Connect {
                connect: Reference::new(string_value(&key, value)?),
            }
        } else if key == TAGS_FIELD {
            FieldWrite::Relation {
                connect: string_list(&key, value)?
                    .into_iter()
                    .map(Reference::new)
                    .collect(),
                disconnect: Vec::new(),
            }
        } else {
            FieldWrite::Value(value)
        };
        fields.insert(key, write);
    }

    Ok(WriteData { fields })
}

fn string_value(key: &str, value: Value) -> RoteiroResult<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(RoteiroError::invalid_input(format!(
            "'{}' must be an id string, got {}",
            key, other
        ))),
    }
}

fn string_list(key: &str, value: Value) -> RoteiroResult<Vec<String>> {
    let Value::Array(items) = value else {
        return Err(RoteiroError::invalid_input(format!(
            "'{}' must be a list of strings",
            key
        )));
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(RoteiroError::invalid_input(format!(
                "'{}' must contain only strings, got {}",
                key, other
            ))),
        })
        .collect()
}

impl WriteData {
    /// Attaches `user: { connect: { id } }` for a create.
    pub fn owned_by(mut self, user_id: &str) -> Self {
        self.fields.insert(
            USER_FIELD.to_string(),
            FieldWrite::Connect {
                connect: Reference::new(user_id),
            },
        );
        self
    }

    /// Replaces the `tags` directive with an explicit diff.
    pub fn with_tag_diff(mut self, diff: RelationDiff) -> Self {
        self.fields.insert(
            TAGS_FIELD.to_string(),
            FieldWrite::Relation {
                connect: diff.connect.into_iter().map(Reference::new).collect(),
                disconnect: diff.disconnect.into_iter().map(Reference::new).collect(),
            },
        );
        self
    }

    /// Requests that `tags` end up exactly as `ids`.
    ///
    /// The store computes the diff against the links it reads inside the
    /// write transaction.
    pub fn with_tag_set(mut self, ids: Vec<String>) -> Self {
        self.fields
            .insert(TAGS_FIELD.to_string(), FieldWrite::Set { set: ids });
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldWrite> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Plain string value, if present.
    pub fn string(&self, key: &str) -> RoteiroResult<Option<String>> {
        match self.fields.get(key) {
            None => Ok(None),
            Some(FieldWrite::Value(Value::String(s))) => Ok(Some(s.clone())),
            Some(_) => Err(RoteiroError::invalid_input(format!(
                "'{}' must be a string",
                key
            ))),
        }
    }

    pub fn require_string(&self, key: &str) -> RoteiroResult<String> {
        self.string(key)?
            .ok_or_else(|| RoteiroError::invalid_input(format!("'{}' is required", key)))
    }

    /// Replacement list from a `{ set }` directive, if present.
    pub fn list(&self, key: &str) -> Option<&[String]> {
        match self.fields.get(key) {
            Some(FieldWrite::Set { set }) => Some(set),
            _ => None,
        }
    }

    /// Target id of a `{ connect: { id } }` directive, if present.
    pub fn connect_id(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(FieldWrite::Connect { connect }) => Some(connect.id.as_str()),
            _ => None,
        }
    }

    pub fn require_connect_id(&self, key: &str) -> RoteiroResult<&str> {
        self.connect_id(key)
            .ok_or_else(|| RoteiroError::invalid_input(format!("'{}' is required", key)))
    }

    /// `(connect, disconnect)` ids of a many-relation directive, if present.
    pub fn relation(&self, key: &str) -> Option<(Vec<&str>, Vec<&str>)> {
        match self.fields.get(key) {
            Some(FieldWrite::Relation {
                connect,
                disconnect,
            }) => Some((
                connect.iter().map(|r| r.id.as_str()).collect(),
                disconnect.iter().map(|r| r.id.as_str()).collect(),
            )),
            _ => None,
        }
    }

    /// Records this write would newly link to, with their kind.
    ///
    /// `user` is excluded; it is set by the server, not the caller.
    pub fn references(&self) -> Vec<(EntityKind, &str)> {
        let mut out = Vec::new();
        for key in POSITION_FIELDS {
            if let Some(id) = self.connect_id(key) {
                out.push((EntityKind::Position, id));
            }
        }
        if let Some((connect, _)) = self.relation(TAGS_FIELD) {
            out.extend(connect.into_iter().map(|id| (EntityKind::Tag, id)));
        }
        if let Some(ids) = self.list(TAGS_FIELD) {
            out.extend(ids.iter().map(|id| (EntityKind::Tag, id.as_str())));
        }
        out
    }
}
