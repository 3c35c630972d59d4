use indexmap::IndexMap;

use crate::dependency::Dependency;
use crate::key::FieldKey;
use crate::value::FormValue;

/// Presentation attributes rendered verbatim on a control. A `Null` value
/// suppresses the attribute.
pub type Attrs = IndexMap<String, FormValue>;

/// A node of the field schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// `None` only for the single unnamed item shape of a bare-scalar array.
    pub key: Option<FieldKey>,
    pub text: String,
    pub kind: FieldKind,
    pub attrs: Attrs,
    /// Display-only hint; for `ipv4` fields a dotted-decimal network mask.
    pub mask: Option<String>,
    /// Initial value for leaves, used whenever the control is (re)rendered.
    pub value: Option<FormValue>,
    pub depends_on: Option<Dependency>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Int,
    Float,
    Bool,
    /// Rendered but not editable; always collected.
    Fixed {
        value: FormValue,
    },
    Enum {
        values: Vec<String>,
    },
    Ipv4,
    Object {
        fields: Vec<Field>,
    },
    /// `fields` describes the shape of one item.
    Array {
        fields: Vec<Field>,
    },
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Fixed { .. } => "fixed",
            Self::Enum { .. } => "enum",
            Self::Ipv4 => "ipv4",
            Self::Object { .. } => "object",
            Self::Array { .. } => "array",
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::Object { .. } | Self::Array { .. })
    }

    /// Controls of this kind notify the dependency engine when they change.
    pub fn is_reactive(&self) -> bool {
        matches!(self, Self::Enum { .. })
    }

    pub fn children(&self) -> &[Field] {
        match self {
            Self::Object { fields } | Self::Array { fields } => fields,
            _ => &[],
        }
    }
}

impl Field {
    pub fn new(key: FieldKey, text: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: Some(key),
            text: text.into(),
            kind,
            attrs: Attrs::new(),
            mask: None,
            value: None,
            depends_on: None,
        }
    }

    /// The unnamed item shape of an array of bare scalars.
    pub fn unnamed(text: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: None,
            ..Self::new(FieldKey::new_unchecked("_"), text, kind)
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<FormValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = Some(mask.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<FormValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.depends_on = Some(dependency);
        self
    }

    pub fn key_str(&self) -> &str {
        self.key.as_ref().map_or("", FieldKey::as_str)
    }

    /// Whether this is an array whose items are a single bare scalar rather
    /// than a named shape.
    pub fn has_bare_items(&self) -> bool {
        match &self.kind {
            FieldKind::Array { fields } => {
                fields.len() == 1 && fields[0].key.is_none() && fields[0].kind.is_leaf()
            }
            _ => false,
        }
    }

    /// The `min` attribute parsed as a number, if any.
    pub fn min(&self) -> Option<f64> {
        match self.attrs.get("min")? {
            FormValue::Int(i) => Some(*i as f64),
            FormValue::Float(f) => Some(*f),
            FormValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_items() {
        let tags = Field::new(
            FieldKey::new_unchecked("tags"),
            "Tags",
            FieldKind::Array {
                fields: vec![Field::unnamed("Tag", FieldKind::String)],
            },
        );
        assert!(tags.has_bare_items());

        let hosts = Field::new(
            FieldKey::new_unchecked("hosts"),
            "Hosts",
            FieldKind::Array {
                fields: vec![Field::new(
                    FieldKey::new_unchecked("name"),
                    "Name",
                    FieldKind::String,
                )],
            },
        );
        assert!(!hosts.has_bare_items());
    }

    #[test]
    fn test_min_attribute() {
        let field = Field::new(FieldKey::new_unchecked("n"), "N", FieldKind::Int);
        assert_eq!(field.min(), None);
        assert_eq!(field.clone().with_attr("min", 0i64).min(), Some(0.0));
        assert_eq!(field.with_attr("min", "-5").min(), Some(-5.0));
    }

    #[test]
    fn test_reactive_kinds() {
        assert!(
            FieldKind::Enum {
                values: vec!["a".into()]
            }
            .is_reactive()
        );
        assert!(!FieldKind::String.is_reactive());
        assert!(!FieldKind::Bool.is_reactive());
    }
}
