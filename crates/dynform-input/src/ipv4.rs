//! IPv4 entry helpers: keystroke handling, input cleanup and the subnet hint.
//!
//! None of this blocks collection; it only shapes what the user types and
//! what the mask hint shows.

use std::net::Ipv4Addr;

/// Longest dotted-quad text.
pub const MAX_IPV4_LEN: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ipv4Key {
    Char(char),
    Backspace,
    Delete,
    ArrowLeft,
    ArrowRight,
    Tab,
    /// Any other named key such as `Enter`.
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Let the key through unchanged.
    Allow,
    /// Swallow the key.
    Reject,
    /// Swallow the key and replace the whole text.
    Replace(String),
}

/// Decides what a keystroke does to the address being typed, assuming the
/// caret sits at the end of `current`.
///
/// A digit typed after a complete three-digit octet moves on to the next
/// octet. Octets above 255, a fifth octet and empty octets are refused.
/// Shortcuts (`modifier` held) always pass.
pub fn ipv4_keydown(current: &str, key: &Ipv4Key, modifier: bool) -> KeyAction {
    let c = match key {
        Ipv4Key::Backspace
        | Ipv4Key::Delete
        | Ipv4Key::ArrowLeft
        | Ipv4Key::ArrowRight
        | Ipv4Key::Tab => return KeyAction::Allow,
        _ if modifier => return KeyAction::Allow,
        Ipv4Key::Named(_) => return KeyAction::Reject,
        Ipv4Key::Char(c) if c.is_ascii_digit() || *c == '.' => *c,
        Ipv4Key::Char(_) => return KeyAction::Reject,
    };

    let parts: Vec<&str> = current.split('.').collect();
    let last = parts.last().copied().unwrap_or_default();
    if parts.len() > 4 {
        return KeyAction::Reject;
    }
    if c == '.' {
        return if last.is_empty() || parts.len() == 4 {
            KeyAction::Reject
        } else {
            KeyAction::Allow
        };
    }
    if last.len() == 3 {
        return if parts.len() < 4 {
            KeyAction::Replace(format!("{current}.{c}"))
        } else {
            KeyAction::Reject
        };
    }
    let octet = format!("{last}{c}");
    match octet.parse::<u32>() {
        Ok(n) if n > 255 => KeyAction::Reject,
        _ => KeyAction::Allow,
    }
}

/// Keeps digits and dots only, capped at the length of a dotted quad.
pub fn sanitize_ipv4(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .take(MAX_IPV4_LEN)
        .collect()
}

/// Parses a strict dotted quad: four decimal octets, each at most 255, with
/// no leading zeros.
pub fn parse_ipv4(s: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = s.split('.');
    for octet in &mut octets {
        *octet = parse_octet(parts.next()?)?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(Ipv4Addr::from(octets))
}

fn parse_octet(s: &str) -> Option<u8> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if s.len() > 1 && s.starts_with('0') {
        return None;
    }
    s.parse().ok()
}

/// Whether `addr` lies inside the network described by `mask`.
///
/// Both must be strict dotted quads, and the mask must be a contiguous run of
/// one bits followed by zero bits with at least one bit set.
pub fn mask_check(addr: &str, mask: &str) -> bool {
    let (Some(addr), Some(mask)) = (parse_ipv4(addr), parse_ipv4(mask)) else {
        return false;
    };
    let addr = u32::from(addr);
    let mask = u32::from(mask);
    if mask == 0 || mask.leading_ones() + mask.trailing_zeros() != 32 {
        return false;
    }
    let network = addr & mask;
    let broadcast = network | !mask;
    (network..=broadcast).contains(&addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> Ipv4Key {
        Ipv4Key::Char(c)
    }

    #[test]
    fn test_mask_check_inside_network() {
        assert!(mask_check("192.168.1.10", "255.255.255.0"));
        assert!(mask_check("10.0.0.5", "255.0.0.0"));
    }

    #[test]
    fn test_mask_check_rejects_empty_mask() {
        assert!(!mask_check("10.0.0.5", "0.0.0.0"));
    }

    #[test]
    fn test_mask_check_rejects_bad_octets() {
        assert!(!mask_check("300.1.1.1", "255.255.255.0"));
        assert!(!mask_check("192.168.01.1", "255.255.255.0"));
        assert!(!mask_check("192.168.1", "255.255.255.0"));
        assert!(!mask_check("192.168.1.1.1", "255.255.255.0"));
        assert!(!mask_check("192.168..1", "255.255.255.0"));
    }

    #[test]
    fn test_mask_check_rejects_non_contiguous_mask() {
        assert!(!mask_check("192.168.1.10", "255.0.255.0"));
        assert!(mask_check("192.168.1.10", "255.255.255.255"));
    }

    #[test]
    fn test_parse_ipv4_allows_single_zero() {
        assert_eq!(parse_ipv4("0.0.0.0"), Some(Ipv4Addr::new(0, 0, 0, 0)));
    }

    #[test]
    fn test_keydown_navigation_always_allowed() {
        assert_eq!(
            ipv4_keydown("1.2.3.4", &Ipv4Key::Backspace, false),
            KeyAction::Allow
        );
        assert_eq!(ipv4_keydown("", &Ipv4Key::Tab, false), KeyAction::Allow);
    }

    #[test]
    fn test_keydown_rejects_letters_unless_modifier() {
        assert_eq!(ipv4_keydown("1", &key('a'), false), KeyAction::Reject);
        assert_eq!(ipv4_keydown("1", &key('c'), true), KeyAction::Allow);
        assert_eq!(
            ipv4_keydown("1", &Ipv4Key::Named("Enter".into()), false),
            KeyAction::Reject
        );
    }

    #[test]
    fn test_keydown_auto_advances_after_full_octet() {
        assert_eq!(
            ipv4_keydown("192", &key('1'), false),
            KeyAction::Replace("192.1".into())
        );
        assert_eq!(ipv4_keydown("1.2.3.255", &key('1'), false), KeyAction::Reject);
    }

    #[test]
    fn test_keydown_rejects_octet_over_255() {
        assert_eq!(ipv4_keydown("10.26", &key('0'), false), KeyAction::Reject);
        assert_eq!(ipv4_keydown("10.25", &key('5'), false), KeyAction::Allow);
    }

    #[test]
    fn test_keydown_dots() {
        assert_eq!(ipv4_keydown("", &key('.'), false), KeyAction::Reject);
        assert_eq!(ipv4_keydown("10.", &key('.'), false), KeyAction::Reject);
        assert_eq!(ipv4_keydown("1.2.3.4", &key('.'), false), KeyAction::Reject);
        assert_eq!(ipv4_keydown("192", &key('.'), false), KeyAction::Allow);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_ipv4("19a2.168.1.1"), "192.168.1.1");
        assert_eq!(sanitize_ipv4("255.255.255.2555"), "255.255.255.255");
    }
}
