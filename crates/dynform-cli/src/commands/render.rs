use dynform_editor::{Editor, EditorConfig};
use dynform_schema::FieldKey;
use tracing::info;

use crate::util::{load_json, load_schema};

#[derive(clap::Args)]
pub struct Args {
    /// Path to the schema JSON file (use - for stdin)
    #[arg(short, long)]
    pub schema: String,
    /// Value to populate the form with
    #[arg(short, long)]
    pub data: Option<String>,
    /// First segment of every element identifier
    #[arg(long, default_value = "data")]
    pub prefix: String,
    /// Identifier of the hosting element
    #[arg(long, default_value = "editor")]
    pub container: String,
    /// Render groups collapsed
    #[arg(long)]
    pub collapsed: bool,
    /// Leave out the expand/collapse toolbar
    #[arg(long)]
    pub form_only: bool,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    anyhow::ensure!(
        !(args.schema == "-" && args.data.as_deref() == Some("-")),
        "Schema and data cannot both be read from stdin"
    );
    let schema = load_schema(&args.schema)?;
    let prefix: FieldKey = args.prefix.parse()?;
    let config = EditorConfig::builder()
        .container(args.container)
        .prefix(prefix)
        .open(!args.collapsed)
        .build();

    let mut editor = Editor::new(schema, config)?;
    editor.build();
    if let Some(data) = &args.data {
        editor.populate_json(&load_json(data)?);
    }
    info!(nodes = editor.tree().len(), "rendered form");

    let html = if args.form_only {
        editor.render_form_html()
    } else {
        editor.render_html()
    };
    println!("{html}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_schema_and_data_both_on_stdin() {
        let args = Args {
            schema: "-".to_string(),
            data: Some("-".to_string()),
            prefix: "data".to_string(),
            container: "editor".to_string(),
            collapsed: false,
            form_only: false,
        };
        let err = run(args).unwrap_err();
        assert!(err.to_string().contains("both be read from stdin"));
    }
}
