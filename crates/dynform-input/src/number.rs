#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Int,
    Float,
}

/// Reduces typed text to the numeric grammar of `kind`.
///
/// A sign is only kept in leading position, and dropped entirely when `min`
/// is non-negative. Floats keep the first decimal separator (a comma counts
/// as one). Anything else is removed. The result is advisory: collection
/// parses whatever text ends up in the control.
pub fn filter_number(text: &str, kind: NumberKind, min: Option<f64>) -> String {
    let text = text.replacen(',', ".", 1);

    let mut signed = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        if c != '-' || i == 0 {
            signed.push(c);
        }
    }

    let mut parts = signed.split('.');
    let head = parts.next().unwrap_or_default();
    let rest: String = parts.collect();
    let merged = if signed.matches('.').count() > 1 {
        format!("{head}.{rest}")
    } else {
        signed.clone()
    };

    let unsigned = min.is_some_and(|min| min >= 0.0);
    merged
        .chars()
        .filter(|c| match c {
            '0'..='9' => true,
            '-' => !unsigned,
            '.' => kind == NumberKind::Float,
            _ => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_with_non_negative_min() {
        assert_eq!(filter_number("-12a3", NumberKind::Int, Some(0.0)), "123");
    }

    #[test]
    fn test_int_keeps_leading_sign_without_min() {
        assert_eq!(filter_number("-12-3", NumberKind::Int, None), "-123");
        assert_eq!(filter_number("-5", NumberKind::Int, Some(-10.0)), "-5");
    }

    #[test]
    fn test_int_drops_separator() {
        assert_eq!(filter_number("1.5", NumberKind::Int, None), "15");
    }

    #[test]
    fn test_float_single_separator() {
        assert_eq!(filter_number("1.2.3", NumberKind::Float, None), "1.23");
        assert_eq!(filter_number("3,14", NumberKind::Float, None), "3.14");
        assert_eq!(filter_number("-0,5x", NumberKind::Float, Some(0.0)), "0.5");
    }

    #[test]
    fn test_float_comma_after_dot() {
        assert_eq!(filter_number("1.2,3", NumberKind::Float, None), "1.23");
    }
}
