use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::info;

use crate::parser::record::CountryRecord;

/// Serialize the full list first, then swap it into place so a failed run leaves no partial file.
pub fn write_json(path: &Path, records: &[CountryRecord]) -> Result<()> {
    let mut json = serde_json::to_string_pretty(records)
        .context("Failed to serialize country list")?;
    json.push('\n');

    // same directory as the target so the final rename stays on one filesystem
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;
    tmp.write_all(json.as_bytes())
        .with_context(|| format!("Failed to write {}", tmp.path().display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to move output into {}", path.display()))?;

    info!("Wrote {} countries to {}", records.len(), path.display());
    Ok(())
}
