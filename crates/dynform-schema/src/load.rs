//! Loading schemas from their JSON description.
//!
//! A schema is either an array of fields or an object with a `fields` array.
//! Each field looks like
//!
//! ```json
//! { "type": "enum", "key": "mode", "text": "Mode", "values": ["dhcp", "static"] }
//! ```
//!
//! Dependency setters are literals, `{"template": "..."}` or
//! `{"lookup": {...}, "default": ...}`. Functions can only be attached from
//! Rust.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::dependency::{Dependency, DependencySet, Setter};
use crate::field::{Attrs, Field, FieldKind};
use crate::key::{FieldKey, FieldKeyError};
use crate::path::FieldPath;
use crate::schema::{Schema, SchemaError};
use crate::value::FormValue;

#[derive(Debug, thiserror::Error)]
pub enum SchemaLoadError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown field type `{kind}` at {path}")]
    UnknownType { kind: String, path: FieldPath },
    #[error("Invalid key `{key}` at {path}: {source}")]
    InvalidKey {
        key: String,
        path: FieldPath,
        source: FieldKeyError,
    },
    #[error("Enum at {path} has no `values`")]
    MissingValues { path: FieldPath },
    #[error("{kind} at {path} has no `fields`")]
    MissingFields { kind: &'static str, path: FieldPath },
    #[error("Unknown dependency setting `{name}` at {path}")]
    UnknownSetting { name: String, path: FieldPath },
    #[error("Setting `attrs` at {path} must be an object")]
    AttrsNotObject { path: FieldPath },
    #[error(transparent)]
    Invalid(#[from] SchemaError),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSchema {
    Fields(Vec<RawField>),
    Document { fields: Vec<RawField> },
}

#[derive(Deserialize)]
struct RawField {
    #[serde(rename = "type")]
    kind: String,
    key: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    attrs: IndexMap<String, JsonValue>,
    mask: Option<String>,
    value: Option<JsonValue>,
    values: Option<Vec<String>>,
    fields: Option<Vec<RawField>>,
    depends_on: Option<RawDependency>,
}

#[derive(Deserialize)]
struct RawDependency {
    key: OneOrMany,
    #[serde(default)]
    set: IndexMap<String, JsonValue>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Schema {
    /// Loads and validates a schema.
    pub fn from_json(value: &JsonValue) -> Result<Self, SchemaLoadError> {
        let raw = RawSchema::deserialize(value)?;
        let fields = match raw {
            RawSchema::Fields(fields) | RawSchema::Document { fields } => fields,
        };
        let schema = Schema::new(convert_fields(fields, &FieldPath::root())?);
        schema.validate()?;
        Ok(schema)
    }

    pub fn from_json_str(s: &str) -> Result<Self, SchemaLoadError> {
        let value: JsonValue = serde_json::from_str(s)?;
        Self::from_json(&value)
    }
}

fn convert_fields(fields: Vec<RawField>, path: &FieldPath) -> Result<Vec<Field>, SchemaLoadError> {
    fields
        .into_iter()
        .map(|field| convert_field(field, path))
        .collect()
}

fn convert_field(raw: RawField, parent: &FieldPath) -> Result<Field, SchemaLoadError> {
    let key = raw
        .key
        .map(|key| {
            key.parse::<FieldKey>()
                .map_err(|source| SchemaLoadError::InvalidKey {
                    key,
                    path: parent.clone(),
                    source,
                })
        })
        .transpose()?;
    let path = match &key {
        Some(key) => parent.child(key),
        None => parent.clone(),
    };

    let kind = match raw.kind.as_str() {
        "string" => FieldKind::String,
        "int" => FieldKind::Int,
        "float" => FieldKind::Float,
        "bool" => FieldKind::Bool,
        "ipv4" => FieldKind::Ipv4,
        "fixed" => FieldKind::Fixed {
            value: raw.value.as_ref().map(FormValue::from_json).unwrap_or_default(),
        },
        "enum" => FieldKind::Enum {
            values: raw
                .values
                .ok_or_else(|| SchemaLoadError::MissingValues { path: path.clone() })?,
        },
        "object" | "array" => {
            let is_object = raw.kind == "object";
            let fields = raw.fields.ok_or_else(|| SchemaLoadError::MissingFields {
                kind: if is_object { "object" } else { "array" },
                path: path.clone(),
            })?;
            let fields = convert_fields(fields, &path)?;
            if is_object {
                FieldKind::Object { fields }
            } else {
                FieldKind::Array { fields }
            }
        }
        other => {
            return Err(SchemaLoadError::UnknownType {
                kind: other.to_string(),
                path,
            });
        }
    };

    let depends_on = raw
        .depends_on
        .map(|dependency| convert_dependency(dependency, &path))
        .transpose()?;

    Ok(Field {
        key,
        text: raw.text,
        kind,
        attrs: convert_attrs(raw.attrs),
        mask: raw.mask,
        value: raw.value.as_ref().map(FormValue::from_json),
        depends_on,
    })
}

fn convert_attrs(attrs: IndexMap<String, JsonValue>) -> Attrs {
    attrs
        .into_iter()
        .map(|(name, value)| (name, FormValue::from_json(&value)))
        .collect()
}

fn convert_dependency(raw: RawDependency, path: &FieldPath) -> Result<Dependency, SchemaLoadError> {
    let keys = match raw.key {
        OneOrMany::One(key) => vec![key],
        OneOrMany::Many(keys) => keys,
    };
    let keys = keys
        .into_iter()
        .map(|key| {
            FieldPath::parse_slash(&key).map_err(|source| SchemaLoadError::InvalidKey {
                key,
                path: path.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut set = DependencySet::default();
    for (name, value) in raw.set {
        match name.as_str() {
            "text" => set.text = Some(convert_setter(value)),
            "value" => set.value = Some(convert_setter(value)),
            "values" => set.values = Some(convert_setter(value)),
            "mask" => set.mask = Some(convert_setter(value)),
            "attrs" => {
                let JsonValue::Object(attrs) = value else {
                    return Err(SchemaLoadError::AttrsNotObject { path: path.clone() });
                };
                for (attr, value) in attrs {
                    set.attrs.insert(attr, convert_setter(value));
                }
            }
            _ => {
                return Err(SchemaLoadError::UnknownSetting {
                    name,
                    path: path.clone(),
                });
            }
        }
    }
    Ok(Dependency { keys, set })
}

fn convert_setter(value: JsonValue) -> Setter {
    if let JsonValue::Object(map) = &value {
        if let (1, Some(JsonValue::String(template))) = (map.len(), map.get("template")) {
            return Setter::Template(template.clone());
        }
        if let Some(JsonValue::Object(cases)) = map.get("lookup") {
            let only_lookup_keys = map.keys().all(|k| k == "lookup" || k == "default");
            if only_lookup_keys {
                return Setter::Lookup {
                    cases: cases
                        .iter()
                        .map(|(k, v)| (k.clone(), FormValue::from_json(v)))
                        .collect(),
                    default: map.get("default").map(FormValue::from_json),
                };
            }
        }
    }
    Setter::Literal(FormValue::from_json(&value))
}
