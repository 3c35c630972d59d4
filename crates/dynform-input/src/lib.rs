//! Leaf controls for dynform editors: widget model, HTML markup and the
//! advisory input filters for numbers and IPv4 addresses.

pub mod ipv4;
pub mod number;
pub mod widget;

pub use ipv4::{Ipv4Key, KeyAction, ipv4_keydown, mask_check, sanitize_ipv4};
pub use number::{NumberKind, filter_number};
pub use widget::{Control, MaskHint, TextMode, Widget, render_input};
