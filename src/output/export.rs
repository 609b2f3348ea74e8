use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::scoring::{ClassFailure, ClassRanking, CompletionMatrix};

/// Everything the certificate and list exports need, in one document.
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub classes: &'a [ClassRanking],
    /// Classes left out of `classes` because their data is invalid
    pub failures: &'a [ClassFailure],
    pub matrix: &'a CompletionMatrix,
}

/// Save rankings to a JSON file atomically
///
/// Uses atomic-write-file so a reader never sees a half-written export.
pub fn write_export(path: &Path, document: &ExportDocument) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, document).context("Failed to serialize rankings")?;

    file.commit().context("Failed to save rankings")?;

    info!(classes = document.classes.len(), "Exported rankings to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{completion_matrix, rank_all_classes, ScoringConfig};
    use crate::snapshot::{Child, Gender, Group, Id, Snapshot};
    use std::env;

    #[test]
    fn test_write_export() {
        let snapshot = Snapshot {
            groups: vec![Group { id: Id::from(1), name: "Igel".into(), class_label: "1a".into() }],
            children: vec![Child {
                id: Id::from(5),
                name: "Lina".into(),
                gender: Gender::Girl,
                class_label: "1a".into(),
                group_id: Some(Id::from(1)),
            }],
            ..Default::default()
        };
        let rankings = rank_all_classes(&snapshot, &ScoringConfig::default());
        let matrix = completion_matrix(&snapshot);
        let document = ExportDocument {
            generated_at: chrono::Utc::now(),
            classes: &rankings.classes,
            failures: &rankings.failures,
            matrix: &matrix,
        };

        let temp_path = env::temp_dir().join("sportfest_test_export.json");
        let _ = std::fs::remove_file(&temp_path);
        write_export(&temp_path, &document).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&temp_path).unwrap()).unwrap();
        assert_eq!(written["classes"][0]["class_label"], "1a");
        assert_eq!(written["classes"][0]["rows"][0]["crown"], "Königin");
        assert_eq!(written["classes"][0]["game_source"], "none");
        assert_eq!(written["failures"].as_array().map(Vec::len), Some(0));

        let _ = std::fs::remove_file(&temp_path);
    }
}
