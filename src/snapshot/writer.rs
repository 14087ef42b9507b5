// ============================================================================
// Écriture du snapshot JSON
// ============================================================================
// - Enveloppe les enregistrements dans { updated_at, etfs }
// - Crée le répertoire de sortie si besoin
// - JSON indenté (2 espaces), caractères non-ASCII conservés tels quels
// - Écrase simplement le fichier existant
// ============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::models::{SnapshotDocument, SnapshotRecord};

/// Résultat de la publication
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// Fichier écrit avec `count` enregistrements
    Written { path: PathBuf, count: usize },

    /// Aucun enregistrement : rien n'est écrit
    Skipped,
}

/// Sérialise le document comme attendu par le front-end
///
/// CONCEPT : serde_json::to_string_pretty
/// - Indentation de 2 espaces
/// - Les chaînes UTF-8 sont écrites telles quelles (pas d'échappement \uXXXX)
pub fn render_snapshot(document: &SnapshotDocument) -> Result<String> {
    serde_json::to_string_pretty(document).context("Échec de la sérialisation du snapshot")
}

/// Écrit le snapshot daté dans `output_path`
pub fn write_snapshot(records: Vec<SnapshotRecord>, output_path: &Path, date: NaiveDate) -> Result<()> {
    let document = SnapshotDocument::new(date, records);
    let json = render_snapshot(&document)?;

    // Un chemin relatif sans répertoire ("etf_data.json") a un parent vide
    if let Some(dir) = output_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            debug!(dir = %dir.display(), "Creating output directory");
        }
        fs::create_dir_all(dir)
            .with_context(|| format!("Échec de la création du répertoire {}", dir.display()))?;
    }

    fs::write(output_path, json)
        .with_context(|| format!("Échec de l'écriture de {}", output_path.display()))?;

    info!(
        path = %output_path.display(),
        updated_at = %document.updated_at,
        count = document.etfs.len(),
        "Snapshot written"
    );
    Ok(())
}

/// Écrit le snapshot seulement s'il contient au moins un enregistrement
///
/// Sans données, le fichier existant (s'il y en a un) n'est pas touché.
pub fn publish_snapshot(
    records: Vec<SnapshotRecord>,
    output_path: &Path,
    date: NaiveDate,
) -> Result<PublishOutcome> {
    if records.is_empty() {
        warn!(path = %output_path.display(), "No records collected, snapshot not written");
        return Ok(PublishOutcome::Skipped);
    }

    let count = records.len();
    write_snapshot(records, output_path, date)?;

    Ok(PublishOutcome::Written {
        path: output_path.to_path_buf(),
        count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskTier, SymbolDescriptor};
    use tempfile::tempdir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn record(ticker: &str, sector: &str) -> SnapshotRecord {
        let descriptor = SymbolDescriptor::new(ticker, "Realty Income Corp", RiskTier::Medium, sector);
        SnapshotRecord::from_quote(&descriptor, Some(55.5), Some(0.0561), 1450.0)
    }

    #[test]
    fn test_render_keeps_non_ascii_and_two_space_indent() {
        let document = SnapshotDocument::new(date(), vec![record("O", "리츠(부동산)")]);
        let json = render_snapshot(&document).unwrap();

        assert!(json.contains("리츠(부동산)"));
        assert!(json.contains("중위험"));
        assert!(!json.contains("\\u"));
        assert!(json.contains("\n  \"updated_at\": \"2025-01-15\""));
        assert!(json.contains("\n  \"etfs\": ["));
    }

    #[test]
    fn test_write_creates_missing_directory() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("public").join("nested").join("etf_data.json");

        write_snapshot(vec![record("O", "리츠(부동산)")], &path, date()).unwrap();

        let written: SnapshotDocument =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.updated_at, "2025-01-15");
        assert_eq!(written.etfs.len(), 1);
        assert_eq!(written.etfs[0].sector, "리츠(부동산)");
        assert_eq!(written.etfs[0].price, 80_475);
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("etf_data.json");
        fs::write(&path, "old content").unwrap();

        write_snapshot(vec![record("O", "리츠")], &path, date()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with('{'));
        assert!(!content.contains("old content"));
    }

    #[test]
    fn test_publish_skips_empty_records() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("public").join("etf_data.json");

        let outcome = publish_snapshot(Vec::new(), &path, date()).unwrap();

        assert_eq!(outcome, PublishOutcome::Skipped);
        assert!(!path.exists());
        assert!(!tmp.path().join("public").exists());
    }

    #[test]
    fn test_publish_leaves_existing_file_untouched_when_empty() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("etf_data.json");
        fs::write(&path, "{\"updated_at\":\"2024-12-31\",\"etfs\":[]}").unwrap();

        publish_snapshot(Vec::new(), &path, date()).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\"updated_at\":\"2024-12-31\",\"etfs\":[]}"
        );
    }

    #[test]
    fn test_publish_reports_count() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("etf_data.json");

        let outcome = publish_snapshot(vec![record("O", "a"), record("SPY", "b")], &path, date()).unwrap();

        assert_eq!(outcome, PublishOutcome::Written { path: path.clone(), count: 2 });
    }
}
