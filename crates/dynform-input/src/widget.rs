use dynform_schema::{Field, FieldKind, FieldPath, FormValue, value};
use maud::{Markup, PreEscaped, Render, html};

use crate::ipv4::{mask_check, sanitize_ipv4};
use crate::number::{NumberKind, filter_number};

/// A rendered leaf control bound to its element identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub id: FieldPath,
    pub label: String,
    pub mask: Option<MaskHint>,
    pub control: Control,
    /// Presentation attributes, in render order.
    pub attrs: Vec<(String, String)>,
    /// Set while the control still has to be wired to the dependency engine.
    pub reactive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Text { value: String, mode: TextMode },
    Toggle { checked: bool },
    /// A closed choice. `value` is empty when nothing is selected.
    Choice { options: Vec<String>, value: String },
    /// Shown but not editable; carries the constant.
    Fixed { value: FormValue },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextMode {
    Plain,
    Integer { min: Option<f64> },
    Decimal { min: Option<f64> },
    Ipv4,
}

/// The mask shown next to an address, and whether the address fits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskHint {
    pub mask: String,
    pub valid: bool,
}

/// Builds the control for a leaf field.
///
/// `current` is the value to show; `None` shows an empty control. Groups
/// (`object`, `array`) have no control of their own and render as an empty
/// text control if passed here.
pub fn render_input(field: &Field, id: &FieldPath, current: Option<&FormValue>) -> Widget {
    let current = current.filter(|v| !v.is_null());
    let text = || current.map(FormValue::display_string).unwrap_or_default();

    let control = match &field.kind {
        FieldKind::Bool => Control::Toggle {
            checked: current.is_some_and(FormValue::truthy),
        },
        FieldKind::Enum { values } => {
            let selected = current.map(FormValue::display_string);
            let value = selected
                .filter(|v| values.contains(v))
                .or_else(|| values.first().cloned())
                .unwrap_or_default();
            Control::Choice {
                options: values.clone(),
                value,
            }
        }
        FieldKind::Fixed { value } => Control::Fixed {
            value: value.clone(),
        },
        FieldKind::Int => Control::Text {
            value: text(),
            mode: TextMode::Integer { min: field.min() },
        },
        FieldKind::Float => Control::Text {
            value: text(),
            mode: TextMode::Decimal { min: field.min() },
        },
        FieldKind::Ipv4 => Control::Text {
            value: text(),
            mode: TextMode::Ipv4,
        },
        FieldKind::String | FieldKind::Object { .. } | FieldKind::Array { .. } => Control::Text {
            value: text(),
            mode: TextMode::Plain,
        },
    };

    let mut widget = Widget {
        id: id.clone(),
        label: field.text.clone(),
        mask: field.mask.as_ref().map(|mask| MaskHint {
            mask: mask.clone(),
            valid: true,
        }),
        attrs: implied_attrs(field),
        control,
        reactive: field.kind.is_reactive(),
    };
    widget.refresh_mask();
    widget
}

fn implied_attrs(field: &Field) -> Vec<(String, String)> {
    let mut attrs: Vec<(String, String)> = field
        .attrs
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| (name.clone(), value.display_string()))
        .collect();

    let implied: &[(&str, &str)] = match field.kind {
        FieldKind::Int => &[("type", "text"), ("step", "1"), ("inputmode", "numeric")],
        FieldKind::Float => &[("type", "text"), ("step", "any"), ("inputmode", "decimal")],
        FieldKind::String | FieldKind::Ipv4 => &[("type", "text")],
        _ => &[],
    };
    for (name, value) in implied {
        if !field.attrs.contains_key(*name) {
            attrs.push((name.to_string(), value.to_string()));
        }
    }
    attrs
}

impl Widget {
    /// Reads the control back as a typed value.
    ///
    /// Numeric text that does not parse yields [`FormValue::NotANumber`].
    pub fn read(&self) -> FormValue {
        match &self.control {
            Control::Toggle { checked } => FormValue::Bool(*checked),
            Control::Text {
                value,
                mode: TextMode::Integer { .. },
            } => value::parse_int_prefix(value),
            Control::Text {
                value,
                mode: TextMode::Decimal { .. },
            } => value::parse_float_prefix(value),
            Control::Text { value, .. } => FormValue::Text(value.clone()),
            Control::Choice { value, .. } => FormValue::Text(value.clone()),
            Control::Fixed { value } => value.clone(),
        }
    }

    /// Writes a value into the control. Constants are left untouched and a
    /// choice outside the options clears the selection.
    pub fn write(&mut self, new: &FormValue) {
        match &mut self.control {
            Control::Toggle { checked } => *checked = new.truthy(),
            Control::Text { value, .. } => *value = new.display_string(),
            Control::Choice { options, value } => {
                let text = new.display_string();
                *value = if options.contains(&text) {
                    text
                } else {
                    String::new()
                };
            }
            Control::Fixed { .. } => {}
        }
        self.refresh_mask();
    }

    /// Applies typed text the way the control's input filter would.
    ///
    /// Returns `false` for controls that take no text.
    pub fn input_text(&mut self, text: &str) -> bool {
        let Control::Text { value, mode } = &mut self.control else {
            return false;
        };
        *value = match *mode {
            TextMode::Plain => text.to_string(),
            TextMode::Integer { min } => filter_number(text, NumberKind::Int, min),
            TextMode::Decimal { min } => filter_number(text, NumberKind::Float, min),
            TextMode::Ipv4 => sanitize_ipv4(text),
        };
        self.refresh_mask();
        true
    }

    pub fn toggle(&mut self, on: bool) -> bool {
        let Control::Toggle { checked } = &mut self.control else {
            return false;
        };
        *checked = on;
        true
    }

    /// Selects an option. Unknown options clear the selection.
    pub fn select(&mut self, option: &str) -> bool {
        let Control::Choice { options, value } = &mut self.control else {
            return false;
        };
        *value = if options.iter().any(|o| o == option) {
            option.to_string()
        } else {
            String::new()
        };
        true
    }

    /// Current text of a text control.
    pub fn text(&self) -> Option<&str> {
        match &self.control {
            Control::Text { value, .. } | Control::Choice { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_ipv4(&self) -> bool {
        matches!(
            self.control,
            Control::Text {
                mode: TextMode::Ipv4,
                ..
            }
        )
    }

    fn refresh_mask(&mut self) {
        let address = match &self.control {
            Control::Text {
                value,
                mode: TextMode::Ipv4,
            } => value.clone(),
            _ => return,
        };
        if let Some(hint) = &mut self.mask {
            hint.valid = mask_check(&address, &hint.mask);
        }
    }

    pub fn html_id(&self) -> String {
        self.id.to_string()
    }

    fn open_tag(&self, tag: &str, extra: &[(&str, &str)]) -> PreEscaped<String> {
        let mut out = format!("<{tag} id=\"{}\"", escape(&self.html_id()));
        for (name, value) in extra {
            out.push_str(&format!(" {name}=\"{}\"", escape(value)));
        }
        for (name, value) in &self.attrs {
            out.push_str(&format!(" {name}=\"{}\"", escape(value)));
        }
        out.push('>');
        PreEscaped(out)
    }
}

fn escape(s: &str) -> String {
    html! { (s) }.into_string()
}

impl Render for Widget {
    fn render(&self) -> Markup {
        let id = self.html_id();
        match &self.control {
            Control::Toggle { checked } => {
                let extra: &[(&str, &str)] = if *checked {
                    &[("type", "checkbox"), ("checked", "checked")]
                } else {
                    &[("type", "checkbox")]
                };
                html! {
                    div {
                        (self.open_tag("input", extra))
                        label for=(id) { (self.label) }
                    }
                }
            }
            control => html! {
                label for=(id) { (self.label) ":" }
                @if let Some(hint) = &self.mask {
                    " "
                    span id={ (id) "_mask" } style=[(!hint.valid).then_some("color: red")] { (hint.mask) }
                }
                " "
                (render_control(self, control))
            },
        }
    }
}

fn render_control(widget: &Widget, control: &Control) -> Markup {
    match control {
        Control::Text { value, .. } => html! {
            (widget.open_tag("input", &[("value", value.as_str())]))
        },
        Control::Choice { options, value } => html! {
            (widget.open_tag("select", &[("data-reactive", "1")]))
            @for option in options {
                option value=(option) selected[option == value] { (option) }
            }
            (PreEscaped("</select>"))
        },
        Control::Fixed { value } => {
            let shown = value.display_string();
            html! {
                span { b { (shown) } }
                (widget.open_tag("input", &[("type", "hidden"), ("value", shown.as_str())]))
            }
        }
        Control::Toggle { .. } => html! {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynform_schema::FieldKey;

    fn path(s: &str) -> FieldPath {
        FieldPath::parse_slash(s).unwrap()
    }

    fn field(kind: FieldKind) -> Field {
        Field::new(FieldKey::new_unchecked("f"), "F", kind)
    }

    #[test]
    fn test_enum_selects_current_value() {
        let field = field(FieldKind::Enum {
            values: vec!["a".into(), "b".into()],
        });
        let widget = render_input(&field, &path("data/f"), Some(&FormValue::text("b")));
        assert_eq!(widget.read(), FormValue::text("b"));
        assert!(widget.reactive);
    }

    #[test]
    fn test_enum_defaults_to_first_option() {
        let field = field(FieldKind::Enum {
            values: vec!["a".into(), "b".into()],
        });
        let widget = render_input(&field, &path("data/f"), Some(&FormValue::text("zzz")));
        assert_eq!(widget.read(), FormValue::text("a"));
    }

    #[test]
    fn test_int_read_parses_or_yields_nan() {
        let mut widget = render_input(&field(FieldKind::Int), &path("data/f"), None);
        assert_eq!(widget.read(), FormValue::NotANumber);
        widget.write(&FormValue::Int(42));
        assert_eq!(widget.read(), FormValue::Int(42));
    }

    #[test]
    fn test_implied_attrs_do_not_override() {
        let field = field(FieldKind::Int).with_attr("inputmode", "tel");
        let widget = render_input(&field, &path("data/f"), None);
        assert_eq!(
            widget.attrs,
            vec![
                ("inputmode".to_string(), "tel".to_string()),
                ("type".to_string(), "text".to_string()),
                ("step".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_null_attrs_are_skipped() {
        let field = field(FieldKind::String).with_attr("disabled", FormValue::Null);
        let widget = render_input(&field, &path("data/f"), None);
        assert!(widget.attrs.iter().all(|(name, _)| name != "disabled"));
    }

    #[test]
    fn test_fixed_ignores_writes() {
        let mut widget = render_input(
            &field(FieldKind::Fixed {
                value: FormValue::text("v1"),
            }),
            &path("data/f"),
            None,
        );
        widget.write(&FormValue::text("other"));
        assert_eq!(widget.read(), FormValue::text("v1"));
    }

    #[test]
    fn test_ipv4_mask_hint() {
        let field = field(FieldKind::Ipv4).with_mask("255.255.255.0");
        let mut widget = render_input(&field, &path("data/f"), None);
        assert!(!widget.mask.as_ref().unwrap().valid);
        widget.input_text("192.168.1.10");
        assert!(widget.mask.as_ref().unwrap().valid);
        widget.input_text("192.168.1.x");
        assert_eq!(widget.text(), Some("192.168.1."));
        assert!(!widget.mask.as_ref().unwrap().valid);
    }

    #[test]
    fn test_input_text_filters_numbers() {
        let field = field(FieldKind::Int).with_attr("min", 0i64);
        let mut widget = render_input(&field, &path("data/f"), None);
        assert!(widget.input_text("-12a3"));
        assert_eq!(widget.read(), FormValue::Int(123));
    }

    #[test]
    fn test_toggle_and_select_reject_wrong_controls() {
        let mut text = render_input(&field(FieldKind::String), &path("data/f"), None);
        assert!(!text.toggle(true));
        assert!(!text.select("a"));
        let mut toggle = render_input(&field(FieldKind::Bool), &path("data/f"), None);
        assert!(!toggle.input_text("x"));
        assert!(toggle.toggle(true));
        assert_eq!(toggle.read(), FormValue::Bool(true));
    }
}
