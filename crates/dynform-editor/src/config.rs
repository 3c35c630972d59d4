//! Configuration for an editor instance.

use dynform_schema::FieldKey;

/// Configuration for an [`Editor`](crate::Editor).
///
/// Use the builder pattern to construct:
/// ```
/// use dynform_editor::EditorConfig;
///
/// let config = EditorConfig::builder()
///     .container("router")
///     .open(false)
///     .build();
/// assert_eq!(config.prefix.as_str(), "data");
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct EditorConfig {
    /// Identifier of the element hosting the editor. The toolbar buttons and
    /// the mount point derive their identifiers from it.
    #[builder(into, default = "editor".to_string())]
    pub container: String,

    /// First segment of every element identifier.
    #[builder(default = FieldKey::new_unchecked("data"))]
    pub prefix: FieldKey,

    /// Caption of the button that appends an array item.
    #[builder(into, default = "+ Add".to_string())]
    pub add_label: String,

    /// Caption of the button that removes an array item.
    #[builder(into, default = "⨯".to_string())]
    pub remove_label: String,

    /// Whether groups start expanded.
    #[builder(default = true)]
    pub open: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
