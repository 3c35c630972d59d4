use std::collections::HashSet;

use crate::field::{Field, FieldKind};
use crate::key::FieldKey;
use crate::path::{FieldPath, PathSegment};

/// The declarative description of a form's data shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub fields: Vec<Field>,
}

#[derive(Debug, PartialEq, thiserror::Error, Clone)]
#[error("Schema error: {kind} at {path}")]
pub struct SchemaError {
    pub kind: SchemaErrorKind,
    pub path: FieldPath,
}

#[derive(Debug, PartialEq, thiserror::Error, Clone)]
pub enum SchemaErrorKind {
    #[error("Duplicate key {key}")]
    DuplicateKey { key: FieldKey },
    #[error("Missing key")]
    MissingKey,
    #[error("Enum without values")]
    EmptyEnum,
    #[error("{kind} without fields")]
    EmptyFields { kind: &'static str },
    #[error("Dependency on unknown field {key}")]
    UnresolvedDependency { key: FieldPath },
    #[error("Dependency on non-leaf field {key}")]
    DependencyOnGroup { key: FieldPath },
    #[error("Dependency without controlling keys")]
    EmptyDependency,
    #[error("Dependency on an unnamed array item")]
    UnnamedDependent,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Finds the field at a schema path. Item indices in `path` are ignored.
    pub fn find(&self, path: &FieldPath) -> Option<&Field> {
        let mut fields = self.fields.as_slice();
        let mut found = None;
        for segment in path.segments() {
            let PathSegment::Key(key) = segment else {
                continue;
            };
            let field = fields.iter().find(|f| f.key.as_ref() == Some(key))?;
            fields = field.kind.children();
            found = Some(field);
        }
        found
    }

    /// Calls `f` with every field and its schema path, parents first.
    pub fn walk<'s>(&'s self, mut f: impl FnMut(&FieldPath, &'s Field)) {
        fn go<'s>(
            fields: &'s [Field],
            path: &FieldPath,
            f: &mut impl FnMut(&FieldPath, &'s Field),
        ) {
            for field in fields {
                let path = match &field.key {
                    Some(key) => path.child(key),
                    None => path.clone(),
                };
                f(&path, field);
                go(field.kind.children(), &path, f);
            }
        }
        go(&self.fields, &FieldPath::root(), &mut f);
    }

    /// Checks the structural invariants the editor relies on.
    ///
    /// Sibling keys must be unique since element identifiers are derived from
    /// them, and every dependency must point at an existing leaf.
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.validate_fields(&self.fields, &FieldPath::root(), false)?;

        let mut result = Ok(());
        self.walk(|path, field| {
            if result.is_err() {
                return;
            }
            let Some(dependency) = &field.depends_on else {
                return;
            };
            if dependency.keys.is_empty() {
                result = Err(SchemaError {
                    kind: SchemaErrorKind::EmptyDependency,
                    path: path.clone(),
                });
                return;
            }
            for key in &dependency.keys {
                let kind = match self.find(key) {
                    None => SchemaErrorKind::UnresolvedDependency { key: key.clone() },
                    Some(target) if !target.kind.is_leaf() => {
                        SchemaErrorKind::DependencyOnGroup { key: key.clone() }
                    }
                    Some(_) => continue,
                };
                result = Err(SchemaError {
                    kind,
                    path: path.clone(),
                });
                return;
            }
        });
        result
    }

    fn validate_fields(
        &self,
        fields: &[Field],
        path: &FieldPath,
        is_item_shape: bool,
    ) -> Result<(), SchemaError> {
        let bare_item = is_item_shape && fields.len() == 1 && fields[0].kind.is_leaf();
        let mut seen = HashSet::new();
        for field in fields {
            let field_path = match &field.key {
                Some(key) => {
                    if !seen.insert(key) {
                        return Err(SchemaError {
                            kind: SchemaErrorKind::DuplicateKey { key: key.clone() },
                            path: path.clone(),
                        });
                    }
                    path.child(key)
                }
                None if bare_item => {
                    if field.depends_on.is_some() {
                        return Err(SchemaError {
                            kind: SchemaErrorKind::UnnamedDependent,
                            path: path.clone(),
                        });
                    }
                    path.clone()
                }
                None => {
                    return Err(SchemaError {
                        kind: SchemaErrorKind::MissingKey,
                        path: path.clone(),
                    });
                }
            };
            match &field.kind {
                FieldKind::Enum { values } if values.is_empty() => {
                    return Err(SchemaError {
                        kind: SchemaErrorKind::EmptyEnum,
                        path: field_path,
                    });
                }
                FieldKind::Object { fields } | FieldKind::Array { fields } if fields.is_empty() => {
                    return Err(SchemaError {
                        kind: SchemaErrorKind::EmptyFields {
                            kind: field.kind.name(),
                        },
                        path: field_path,
                    });
                }
                FieldKind::Object { fields } => {
                    self.validate_fields(fields, &field_path, false)?;
                }
                FieldKind::Array { fields } => {
                    self.validate_fields(fields, &field_path, true)?;
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::{Dependency, DependencySet, Setter};

    fn key(s: &'static str) -> FieldKey {
        FieldKey::new_unchecked(s)
    }

    fn network_schema() -> Schema {
        Schema::new(vec![
            Field::new(
                key("mode"),
                "Mode",
                FieldKind::Enum {
                    values: vec!["dhcp".into(), "static".into()],
                },
            ),
            Field::new(
                key("lan"),
                "LAN",
                FieldKind::Object {
                    fields: vec![
                        Field::new(key("address"), "Address", FieldKind::Ipv4).with_dependency(
                            Dependency::new(
                                FieldPath::parse_slash("mode").unwrap(),
                                DependencySet::default().text(Setter::Template("{value}".into())),
                            ),
                        ),
                    ],
                },
            ),
            Field::new(
                key("dns"),
                "DNS",
                FieldKind::Array {
                    fields: vec![Field::unnamed("Server", FieldKind::Ipv4)],
                },
            ),
        ])
    }

    #[test]
    fn test_valid_schema() {
        assert_eq!(network_schema().validate(), Ok(()));
    }

    #[test]
    fn test_find_ignores_indices() {
        let schema = network_schema();
        let field = schema
            .find(&FieldPath::parse_slash("lan/address").unwrap())
            .unwrap();
        assert_eq!(field.text, "Address");
        assert!(schema.find(&FieldPath::parse_slash("lan/0/address").unwrap()).is_some());
        assert!(schema.find(&FieldPath::parse_slash("lan/missing").unwrap()).is_none());
    }

    #[test]
    fn test_duplicate_keys() {
        let schema = Schema::new(vec![
            Field::new(key("a"), "A", FieldKind::String),
            Field::new(key("a"), "A again", FieldKind::Int),
        ]);
        assert_eq!(
            schema.validate(),
            Err(SchemaError {
                kind: SchemaErrorKind::DuplicateKey { key: key("a") },
                path: FieldPath::root(),
            })
        );
    }

    #[test]
    fn test_same_key_in_different_groups_is_fine() {
        let schema = Schema::new(vec![
            Field::new(
                key("a"),
                "A",
                FieldKind::Object {
                    fields: vec![Field::new(key("x"), "X", FieldKind::String)],
                },
            ),
            Field::new(
                key("b"),
                "B",
                FieldKind::Object {
                    fields: vec![Field::new(key("x"), "X", FieldKind::String)],
                },
            ),
        ]);
        assert_eq!(schema.validate(), Ok(()));
    }

    #[test]
    fn test_unnamed_field_outside_array() {
        let schema = Schema::new(vec![Field::unnamed("Loose", FieldKind::String)]);
        assert_eq!(
            schema.validate().unwrap_err().kind,
            SchemaErrorKind::MissingKey
        );
    }

    #[test]
    fn test_empty_enum() {
        let schema = Schema::new(vec![Field::new(
            key("e"),
            "E",
            FieldKind::Enum { values: vec![] },
        )]);
        let err = schema.validate().unwrap_err();
        assert_eq!(err.kind, SchemaErrorKind::EmptyEnum);
        assert_eq!(err.path.to_string(), "e");
    }

    #[test]
    fn test_unresolved_dependency() {
        let schema = Schema::new(vec![Field::new(key("b"), "B", FieldKind::String)
            .with_dependency(Dependency::new(
                FieldPath::parse_slash("nope").unwrap(),
                DependencySet::default(),
            ))]);
        let err = schema.validate().unwrap_err();
        assert_eq!(
            err.kind,
            SchemaErrorKind::UnresolvedDependency {
                key: FieldPath::parse_slash("nope").unwrap()
            }
        );
        assert_eq!(err.path.to_string(), "b");
    }

    #[test]
    fn test_walk_visits_parents_first() {
        let mut paths = Vec::new();
        network_schema().walk(|path, _| paths.push(path.to_string()));
        assert_eq!(paths, vec!["mode", "lan", "lan/address", "dns", "dns"]);
    }
}
