use crate::error::Error;
use crate::page_range;
use crate::pdf::{assemble, PdfDocument};
use crate::plan::{plan_merge, MergeEntry};
use crate::validate;
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize)]
pub struct MergeOutcome {
    pub output: PathBuf,
    pub inputs: usize,
    pub pages: usize,
}

/// Check everything about a merge that can be checked without reading documents
fn validate_merge(entries: &[MergeEntry], output: &Path) -> Result<(), Error> {
    let name = output
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    validate::ensure_output_name(name)?;

    if entries.len() < 2 {
        return Err(Error::NotEnoughInputs(entries.len()));
    }

    for entry in entries {
        validate::ensure_pdf_input(&entry.path)?;
        if let Some(pages) = &entry.pages {
            page_range::validate(pages)?;
        }
    }

    Ok(())
}

/// Merge the given entries, in order, into `output`.
pub fn merge_pdf<P: AsRef<Path>>(entries: &[MergeEntry], output: P) -> Result<MergeOutcome> {
    let output = output.as_ref();
    validate_merge(entries, output)?;

    let plan = plan_merge(entries, |path| {
        PdfDocument::open(path)
            .map(|doc| doc.page_count())
            .map_err(|e| Error::Document {
                path: path.to_path_buf(),
                reason: format!("{:#}", e),
            })
    })?;

    info!(
        inputs = entries.len(),
        pages = plan.page_count(),
        output = %output.display(),
        "merging"
    );

    let mut merged = assemble(&plan.segments())?;
    PdfDocument::save(&mut merged, output)?;

    Ok(MergeOutcome {
        output: output.to_path_buf(),
        inputs: entries.len(),
        pages: plan.page_count(),
    })
}

pub fn run<P: AsRef<Path>>(entries: &[MergeEntry], output: P) -> Result<()> {
    let outcome = merge_pdf(entries, output)?;

    println!(
        "Merged {} files ({} pages) into {}",
        outcome.inputs,
        outcome.pages,
        outcome.output.display()
    );

    Ok(())
}
