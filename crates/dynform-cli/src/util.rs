use std::fs;
use std::io::{self, Read};

use anyhow::Context;
use dynform_schema::Schema;
use serde_json::Value as JsonValue;

/// Reads a file, or stdin when `path` is `-`.
pub fn read_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Error reading from stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(path).with_context(|| format!("Error reading file {path}"))
}

pub fn load_schema(path: &str) -> anyhow::Result<Schema> {
    let contents = read_input(path)?;
    Schema::from_json_str(&contents).with_context(|| format!("Invalid schema in {}", display_path(path)))
}

pub fn load_json(path: &str) -> anyhow::Result<JsonValue> {
    let contents = read_input(path)?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", display_path(path)))
}

pub fn display_path(path: &str) -> &str {
    if path == "-" { "<stdin>" } else { path }
}
