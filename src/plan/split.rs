use crate::error::{Error, Result};
use crate::page_range::PageRangeExpr;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// How the selected pages are distributed over output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// All selected pages in one file
    #[default]
    SingleFile,
    /// One file per comma-separated token
    RangeFiles,
    /// One file per selected page
    MultiFiles,
}

impl SplitMode {
    pub const ALL: [SplitMode; 3] = [
        SplitMode::SingleFile,
        SplitMode::RangeFiles,
        SplitMode::MultiFiles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SplitMode::SingleFile => "single_file",
            SplitMode::RangeFiles => "range_files",
            SplitMode::MultiFiles => "multi_files",
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SplitMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| Error::UnsupportedMode(s.to_string()))
    }
}

/// Pages to copy into one new document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFile {
    /// 1-based sequence number, used in the file name
    pub index: usize,
    pub pages: Vec<u32>,
}

impl OutputFile {
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}_{}.pdf", stem, self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitPlan {
    pub mode: SplitMode,
    pub files: Vec<OutputFile>,
}

impl SplitPlan {
    fn new(mode: SplitMode, groups: Vec<Vec<u32>>) -> Self {
        let files = groups
            .into_iter()
            .enumerate()
            .map(|(i, pages)| OutputFile {
                index: i + 1,
                pages,
            })
            .collect();
        SplitPlan { mode, files }
    }

    pub fn page_count(&self) -> usize {
        self.files.iter().map(|f| f.pages.len()).sum()
    }
}

/// Work out which pages of a `total_pages` document go into which output file.
///
/// The whole expression is bounds-checked before anything is expanded, so an
/// out-of-range page anywhere fails the entire plan.
pub fn plan_split(total_pages: u32, pages: &str, mode: SplitMode) -> Result<SplitPlan> {
    let expr = PageRangeExpr::parse(pages)?;

    let max = expr.max_page();
    if max > total_pages {
        return Err(Error::PageOutOfRange {
            page: max,
            total: total_pages,
        });
    }

    let groups = match mode {
        SplitMode::SingleFile => vec![expr.flatten()],
        SplitMode::RangeFiles => expr.groups(),
        SplitMode::MultiFiles => expr.flatten().into_iter().map(|p| vec![p]).collect(),
    };

    let plan = SplitPlan::new(mode, groups);
    debug!(
        mode = %mode,
        files = plan.files.len(),
        pages = plan.page_count(),
        "planned split"
    );
    Ok(plan)
}
