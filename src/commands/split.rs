use crate::page_range;
use crate::pdf::PdfDocument;
use crate::plan::{plan_split, SplitMode};
use crate::validate;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Serialize)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub pages: Vec<u32>,
}

#[derive(Debug, Serialize)]
pub struct SplitOutcome {
    pub source: PathBuf,
    pub mode: SplitMode,
    pub files: Vec<WrittenFile>,
}

/// Split `input` into new files under `output_dir`, named `{stem}_{n}.pdf`.
///
/// Nothing is written unless the page expression is valid and fits the document.
pub fn split_pdf<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    pages: &str,
    mode: SplitMode,
    output_dir: Q,
) -> Result<SplitOutcome> {
    let input = input.as_ref();
    let output_dir = output_dir.as_ref();

    validate::ensure_pdf_input(input)?;
    page_range::validate(pages)?;

    let doc = PdfDocument::open_unlocked(input)?;
    let total_pages = doc.page_count();
    let plan = plan_split(total_pages, pages, mode)?;

    info!(
        source = %input.display(),
        total_pages,
        mode = %mode,
        outputs = plan.files.len(),
        "splitting"
    );

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    // Get the base name of the input file
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("split");

    let mut files = Vec::with_capacity(plan.files.len());
    for file in plan.files {
        let output_path = output_dir.join(file.file_name(stem));

        let mut new_doc = doc.extract_pages(&file.pages)?;
        PdfDocument::save(&mut new_doc, &output_path)?;
        debug!(path = %output_path.display(), pages = ?file.pages, "wrote split file");

        files.push(WrittenFile {
            path: output_path,
            pages: file.pages,
        });
    }

    Ok(SplitOutcome {
        source: input.to_path_buf(),
        mode,
        files,
    })
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    pages: &str,
    mode: SplitMode,
    output_dir: Q,
) -> Result<()> {
    let outcome = split_pdf(input, pages, mode, output_dir)?;

    let count = outcome.files.len();
    if count == 1 {
        println!("The PDF file was successfully split into 1 file");
    } else {
        println!("The PDF file was successfully split into {} files", count);
    }
    for file in &outcome.files {
        println!("  {}", file.path.display());
    }

    Ok(())
}
