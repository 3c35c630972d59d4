//! Descriptor overrides produced by dependency bindings.
//!
//! The schema itself is never mutated. Overrides are keyed by a path relative
//! to the form root. A key without indices applies to every instance of the
//! field; a key that keeps some item indices applies only inside those items.
//! Overrides survive `build()`.

use std::borrow::Cow;
use std::collections::HashMap;

use dynform_schema::{DependencySet, Field, FieldKind, FieldPath, FormValue, PathSegment};
use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOverlay {
    pub text: Option<String>,
    pub value: Option<FormValue>,
    pub values: Option<Vec<String>>,
    /// `Some(None)` removes the base mask.
    pub mask: Option<Option<String>>,
    /// Merged over the base attributes one entry at a time.
    pub attrs: IndexMap<String, FormValue>,
}

impl FieldOverlay {
    /// Evaluates every setter of `set` against the controller's value.
    pub fn apply(&mut self, set: &DependencySet, controller: &FormValue) {
        if let Some(setter) = &set.text {
            self.text = Some(setter.apply(controller).display_string());
        }
        if let Some(setter) = &set.value {
            self.value = Some(setter.apply(controller));
        }
        if let Some(setter) = &set.values {
            self.values = Some(match setter.apply(controller) {
                FormValue::Array(items) => items.iter().map(FormValue::display_string).collect(),
                FormValue::Null => Vec::new(),
                other => vec![other.display_string()],
            });
        }
        if let Some(setter) = &set.mask {
            self.mask = Some(match setter.apply(controller) {
                FormValue::Null => None,
                other => Some(other.display_string()),
            });
        }
        for (name, setter) in &set.attrs {
            self.attrs.insert(name.clone(), setter.apply(controller));
        }
    }

    /// Layers `other` on top of this overlay.
    pub fn merge(&mut self, other: &FieldOverlay) {
        if other.text.is_some() {
            self.text.clone_from(&other.text);
        }
        if other.value.is_some() {
            self.value.clone_from(&other.value);
        }
        if other.values.is_some() {
            self.values.clone_from(&other.values);
        }
        if other.mask.is_some() {
            self.mask.clone_from(&other.mask);
        }
        for (name, value) in &other.attrs {
            self.attrs.insert(name.clone(), value.clone());
        }
    }

    /// The base descriptor with this overlay on top.
    pub fn overlay(&self, base: &Field) -> Field {
        let mut field = base.clone();
        if let Some(text) = &self.text {
            field.text = text.clone();
        }
        if let Some(value) = &self.value {
            field.value = Some(value.clone());
            if let FieldKind::Fixed { value: constant } = &mut field.kind {
                *constant = value.clone();
            }
        }
        if let (Some(values), FieldKind::Enum { values: base_values }) =
            (&self.values, &mut field.kind)
        {
            *base_values = values.clone();
        }
        if let Some(mask) = &self.mask {
            field.mask = mask.clone();
        }
        for (name, value) in &self.attrs {
            field.attrs.insert(name.clone(), value.clone());
        }
        field
    }
}

/// Keys an override for the instance at `path` may be stored under, least
/// specific first: all indices dropped, then the leading indices kept one by
/// one, up to `path` itself.
pub fn override_keys(path: &FieldPath) -> Vec<FieldPath> {
    let mut keys = vec![path.without_indices()];
    for (position, segment) in path.segments().iter().enumerate() {
        if !matches!(segment, PathSegment::Index(_)) {
            continue;
        }
        let key: FieldPath = path
            .segments()
            .iter()
            .enumerate()
            .filter(|(i, segment)| *i <= position || matches!(segment, PathSegment::Key(_)))
            .map(|(_, segment)| segment.clone())
            .collect();
        keys.push(key);
    }
    keys
}

/// Key for an override of the field at schema path `dependent` triggered by
/// the control at `controller` (both relative to the form root).
///
/// The override is confined to the innermost array item of the controller
/// that also contains the dependent. A controller outside arrays, or one
/// whose items do not contain the dependent, yields the index-free key.
pub fn scoped_key(controller: &FieldPath, dependent: &FieldPath) -> FieldPath {
    let segments = controller.segments();
    for (position, segment) in segments.iter().enumerate().rev() {
        if !matches!(segment, PathSegment::Index(_)) {
            continue;
        }
        let scope = FieldPath(segments[..=position].to_vec());
        let shape = scope.without_indices();
        if dependent.starts_with(&shape) {
            let mut key = scope;
            for segment in &dependent.segments()[shape.len()..] {
                key.push(segment.clone());
            }
            return key;
        }
    }
    dependent.without_indices()
}

#[derive(Debug, Clone, Default)]
pub struct OverlayStore {
    overlays: HashMap<FieldPath, FieldOverlay>,
}

impl OverlayStore {
    /// The override stored under exactly `key`.
    pub fn get(&self, key: &FieldPath) -> Option<&FieldOverlay> {
        self.overlays.get(key)
    }

    /// Records the outcome of a dependency firing under `key`.
    pub fn record(&mut self, key: &FieldPath, set: &DependencySet, controller: &FormValue) {
        self.overlays
            .entry(key.clone())
            .or_default()
            .apply(set, controller);
    }

    /// Every override applying to the instance at `path`, layered from the
    /// least to the most specific.
    pub fn merged(&self, path: &FieldPath) -> Option<FieldOverlay> {
        let mut merged: Option<FieldOverlay> = None;
        for key in override_keys(path) {
            if let Some(overlay) = self.overlays.get(&key) {
                merged.get_or_insert_with(FieldOverlay::default).merge(overlay);
            }
        }
        merged
    }

    /// The descriptor to render for the instance at `path`.
    pub fn effective<'f>(&self, path: &FieldPath, base: &'f Field) -> Cow<'f, Field> {
        match self.merged(path) {
            Some(overlay) => Cow::Owned(overlay.overlay(base)),
            None => Cow::Borrowed(base),
        }
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn clear(&mut self) {
        self.overlays.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynform_schema::{FieldKey, Setter};

    fn path(s: &str) -> FieldPath {
        FieldPath::parse_slash(s).unwrap()
    }

    #[test]
    fn test_attrs_merge_shallowly() {
        let base = Field::new(FieldKey::new_unchecked("b"), "B", FieldKind::String)
            .with_attr("placeholder", "host")
            .with_attr("maxlength", 8i64);
        let set = DependencySet::default().attr("maxlength", Setter::Literal(FormValue::Int(16)));
        let mut store = OverlayStore::default();
        store.record(&path("b"), &set, &FormValue::text("x"));

        let field = store.effective(&path("b"), &base);
        assert_eq!(field.attrs.get("placeholder"), Some(&FormValue::text("host")));
        assert_eq!(field.attrs.get("maxlength"), Some(&FormValue::Int(16)));
        assert_eq!(base.attrs.get("maxlength"), Some(&FormValue::Int(8)));
    }

    #[test]
    fn test_values_replace_enum_options() {
        let base = Field::new(
            FieldKey::new_unchecked("speed"),
            "Speed",
            FieldKind::Enum {
                values: vec!["10".into()],
            },
        );
        let set = DependencySet::default().values(Setter::function(|v| {
            if v.as_str() == Some("fiber") {
                FormValue::Array(vec!["1000".into(), "10000".into()])
            } else {
                FormValue::Array(vec!["10".into(), "100".into()])
            }
        }));
        let mut store = OverlayStore::default();
        store.record(&path("speed"), &set, &FormValue::text("fiber"));
        let field = store.effective(&path("speed"), &base);
        assert_eq!(
            field.kind,
            FieldKind::Enum {
                values: vec!["1000".into(), "10000".into()]
            }
        );
    }

    #[test]
    fn test_index_free_key_applies_to_every_item() {
        let mut store = OverlayStore::default();
        let set = DependencySet::default().text(Setter::Template("Port {value}".into()));
        store.record(&path("links/port"), &set, &FormValue::Int(1));
        assert!(store.merged(&path("links/0/port")).is_some());
        assert!(store.merged(&path("links/5/port")).is_some());
    }

    #[test]
    fn test_item_key_stays_in_its_item() {
        let mut store = OverlayStore::default();
        let set = DependencySet::default().value(Setter::Literal(FormValue::text("9100")));
        store.record(&path("links/1/port"), &set, &FormValue::text("printer"));
        assert!(store.merged(&path("links/0/port")).is_none());
        assert_eq!(
            store.merged(&path("links/1/port")).unwrap().value,
            Some(FormValue::text("9100"))
        );
    }

    #[test]
    fn test_specific_key_wins_over_shape_wide() {
        let mut store = OverlayStore::default();
        let text = |t: &str| DependencySet::default().text(Setter::Literal(FormValue::text(t)));
        store.record(&path("links/port"), &text("all"), &FormValue::Null);
        store.record(&path("links/2/port"), &text("third"), &FormValue::Null);
        assert_eq!(store.merged(&path("links/0/port")).unwrap().text.as_deref(), Some("all"));
        assert_eq!(store.merged(&path("links/2/port")).unwrap().text.as_deref(), Some("third"));
    }

    #[test]
    fn test_override_keys() {
        let keys: Vec<String> = override_keys(&path("outer/0/inner/1/x"))
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(keys, vec!["outer/inner/x", "outer/0/inner/x", "outer/0/inner/1/x"]);
    }

    #[test]
    fn test_scoped_key() {
        assert_eq!(scoped_key(&path("hosts/1/kind"), &path("hosts/port")), path("hosts/1/port"));
        assert_eq!(scoped_key(&path("mode"), &path("hosts/port")), path("hosts/port"));
        assert_eq!(
            scoped_key(&path("outer/0/inner/1/ctl"), &path("outer/y")),
            path("outer/0/y")
        );
        assert_eq!(scoped_key(&path("hosts/1/kind"), &path("title")), path("title"));
    }

    #[test]
    fn test_null_mask_removes_hint() {
        let base = Field::new(FieldKey::new_unchecked("gw"), "GW", FieldKind::Ipv4)
            .with_mask("255.0.0.0");
        let set = DependencySet::default().mask(Setter::Literal(FormValue::Null));
        let mut store = OverlayStore::default();
        store.record(&path("gw"), &set, &FormValue::Null);
        assert_eq!(store.effective(&path("gw"), &base).mask, None);
    }

    #[test]
    fn test_no_overlay_borrows_base() {
        let base = Field::new(FieldKey::new_unchecked("a"), "A", FieldKind::String);
        let store = OverlayStore::default();
        assert!(matches!(store.effective(&path("a"), &base), Cow::Borrowed(_)));
    }
}
