use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::job::PanelRecord;

/// Machine-readable summary of one batch run, written next to the
/// matrix and BOQ artifacts for downstream reporting.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchManifest {
    pub created_at: DateTime<Utc>,
    pub spare_percent: f64,
    pub num_panels: usize,
    pub solved: usize,
    pub unsolved: usize,
    pub failed: usize,
    pub panels: Vec<PanelRecord>,
}

pub fn write_batch_manifest(path: &Path, manifest: &BatchManifest) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating manifest directory '{}'", parent.display()))?;
    }
    let json =
        serde_json::to_string_pretty(manifest).context("serializing batch manifest to JSON")?;
    fs::write(path, json)
        .with_context(|| format!("writing batch manifest '{}'", path.display()))?;
    Ok(())
}

pub fn load_batch_manifest(path: &Path) -> Result<BatchManifest> {
    let file = fs::File::open(path)
        .with_context(|| format!("opening batch manifest '{}'", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("parsing batch manifest '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn manifest_writes_and_reads_back() {
        let record = PanelRecord {
            panel_name: "AHU-1".into(),
            kind: "controller".into(),
            status: "ok".into(),
            error: None,
            total_cost: 1234.5,
            option: None,
        };
        let manifest = BatchManifest {
            created_at: Utc::now(),
            spare_percent: 20.0,
            num_panels: 1,
            solved: 1,
            unsolved: 0,
            failed: 0,
            panels: vec![record.clone()],
        };
        let tmp = NamedTempFile::new().unwrap();
        write_batch_manifest(tmp.path(), &manifest).unwrap();
        let parsed = load_batch_manifest(tmp.path()).unwrap();
        assert_eq!(parsed.num_panels, 1);
        assert_eq!(parsed.panels.first().unwrap().panel_name, record.panel_name);
    }
}
