use dynform_editor::{Editor, EditorConfig};

use crate::util::{load_json, load_schema};

#[derive(clap::Args)]
pub struct Args {
    /// Path to the schema JSON file (use - for stdin)
    #[arg(short, long)]
    pub schema: String,
    /// Path to the value JSON file (use - for stdin)
    #[arg(short, long)]
    pub data: String,
    /// Pretty print JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    anyhow::ensure!(
        !(args.schema == "-" && args.data == "-"),
        "Schema and data cannot both be read from stdin"
    );
    let schema = load_schema(&args.schema)?;
    let data = load_json(&args.data)?;

    let mut editor = Editor::new(schema, EditorConfig::default())?;
    editor.build();
    editor.populate_json(&data);
    let collected = editor.collect_json();

    let output = if args.pretty {
        serde_json::to_string_pretty(&collected)?
    } else {
        serde_json::to_string(&collected)?
    };
    println!("{output}");
    Ok(())
}
