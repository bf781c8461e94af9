//! Loading model settings from command line arguments.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result, bail};
use dialset_model::ModelSettings;

/// Parses a settings argument.
///
/// The argument is either inline JSON or `@path` naming a `.json` or
/// `.toml` file. A blank argument yields empty settings.
pub fn load_settings(arg: &str) -> Result<ModelSettings> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Ok(ModelSettings::default());
    }
    match arg.strip_prefix('@') {
        Some(path) => load_file(Path::new(path)),
        None => serde_json::from_str(arg).context("invalid inline settings"),
    }
}

fn load_file(path: &Path) -> Result<ModelSettings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    trace!("loaded {} bytes from {}", text.len(), path.display());
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&text)
            .with_context(|| format!("invalid settings in {}", path.display())),
        Some("json") => serde_json::from_str(&text)
            .with_context(|| format!("invalid settings in {}", path.display())),
        _ => bail!(
            "unsupported settings file {}, expected .json or .toml",
            path.display()
        ),
    }
}
