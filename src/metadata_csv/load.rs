//! Metadata sheet loading with a human readable report
use super::{parse_metadata_csv, ParsedMetadata};
use anyhow::{Context, Result};
use tracing::info;

pub fn load_metadata<P: AsRef<std::path::Path>>(path: P) -> Result<ParsedMetadata> {
    let path = path.as_ref();
    info!("Loading metadata sheet {}...", path.display());
    let parsed = parse_metadata_csv(path)
        .with_context(|| format!("Could not parse metadata sheet {}", path.display()))?;

    let problems = &parsed.problems;
    if !problems.is_empty() {
        info!("Found {} problems:", problems.len());
        for problem in problems.iter() {
            info!("- {:?}", problem);
        }
        info!("");
    }

    match (parsed.skipped_rows(), problems.is_empty()) {
        (_, true) => info!("Metadata sheet checked, no issues found."),
        (0, false) => info!(
            "Metadata sheet was parsed, but check the {} non-fatal issues above.",
            problems.len()
        ),
        (skipped, false) => info!(
            "Metadata sheet was parsed, {} rows were skipped, check the issues above.",
            skipped
        ),
    }

    info!(
        "Metadata sheet has:\n{} rows\n{} collections\n{} songs",
        parsed.rows_read,
        parsed.index.collections_count(),
        parsed.index.songs_count()
    );
    Ok(parsed)
}
