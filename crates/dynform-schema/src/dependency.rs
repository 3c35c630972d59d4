//! Bindings that derive field attributes from another field's current value.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::path::FieldPath;
use crate::value::FormValue;

/// Re-derives attributes of the owning field whenever any of `keys` changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Dependency {
    /// Controlling field paths, relative to the schema root.
    pub keys: Vec<FieldPath>,
    pub set: DependencySet,
}

impl Dependency {
    pub fn new(key: FieldPath, set: DependencySet) -> Self {
        Self {
            keys: vec![key],
            set,
        }
    }

    /// Whether a change on the schema-shape path `path` triggers this binding.
    pub fn is_triggered_by(&self, path: &FieldPath) -> bool {
        let path = path.without_indices();
        self.keys.iter().any(|key| key.without_indices() == path)
    }
}

/// Descriptor attributes overwritten when a dependency fires.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencySet {
    pub text: Option<Setter>,
    pub value: Option<Setter>,
    pub values: Option<Setter>,
    pub mask: Option<Setter>,
    /// Merged into the existing attributes one entry at a time.
    pub attrs: IndexMap<String, Setter>,
}

impl DependencySet {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.value.is_none()
            && self.values.is_none()
            && self.mask.is_none()
            && self.attrs.is_empty()
    }

    pub fn text(mut self, setter: Setter) -> Self {
        self.text = Some(setter);
        self
    }

    pub fn value(mut self, setter: Setter) -> Self {
        self.value = Some(setter);
        self
    }

    pub fn values(mut self, setter: Setter) -> Self {
        self.values = Some(setter);
        self
    }

    pub fn mask(mut self, setter: Setter) -> Self {
        self.mask = Some(setter);
        self
    }

    pub fn attr(mut self, name: impl Into<String>, setter: Setter) -> Self {
        self.attrs.insert(name.into(), setter);
        self
    }
}

pub type SetterFn = dyn Fn(&FormValue) -> FormValue + Send + Sync;

/// Produces a new attribute value from the controlling field's value.
///
/// Every variant is a pure function of its input.
#[derive(Clone)]
pub enum Setter {
    Literal(FormValue),
    /// `{value}` is replaced by the controller's display string.
    Template(String),
    /// Chooses by the controller's display string.
    Lookup {
        cases: IndexMap<String, FormValue>,
        default: Option<FormValue>,
    },
    Function(Arc<SetterFn>),
}

impl Setter {
    pub fn function(f: impl Fn(&FormValue) -> FormValue + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    pub fn apply(&self, controller: &FormValue) -> FormValue {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Template(template) => {
                FormValue::Text(template.replace("{value}", &controller.display_string()))
            }
            Self::Lookup { cases, default } => cases
                .get(&controller.display_string())
                .or(default.as_ref())
                .cloned()
                .unwrap_or_default(),
            Self::Function(f) => f(controller),
        }
    }
}

impl fmt::Debug for Setter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Self::Lookup { cases, default } => f
                .debug_struct("Lookup")
                .field("cases", cases)
                .field("default", default)
                .finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl PartialEq for Setter {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Template(a), Self::Template(b)) => a == b,
            (
                Self::Lookup {
                    cases: c1,
                    default: d1,
                },
                Self::Lookup {
                    cases: c2,
                    default: d2,
                },
            ) => c1 == c2 && d1 == d2,
            (Self::Function(a), Self::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
