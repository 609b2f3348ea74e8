use super::raw::RawSnapshot;
use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Load a raw snapshot document from a JSON or YAML file.
///
/// The format is chosen by extension: `.yaml`/`.yml` are read as YAML,
/// everything else as JSON.
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist or cannot be read
/// - The document cannot be parsed
pub fn load_snapshot(path: &Path) -> Result<RawSnapshot> {
    if !path.exists() {
        anyhow::bail!("Snapshot file not found at {}", path.display());
    }

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let raw: RawSnapshot = if is_yaml {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot file at {}", path.display()))?;
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: invalid YAML in {}", path.display()))?
    } else {
        let file = File::open(path)
            .with_context(|| format!("Failed to open snapshot file at {}", path.display()))?;
        serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse snapshot: invalid JSON in {}", path.display()))?
    };

    debug!(
        games = raw.games.len(),
        groups = raw.groups.len(),
        children = raw.children.len(),
        results = raw.results.len(),
        "Loaded snapshot from {}",
        path.display()
    );

    Ok(raw)
}
