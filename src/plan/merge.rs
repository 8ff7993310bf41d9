use crate::error::{Error, Result};
use crate::page_range::parse_flat;
use serde::Serialize;
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// One input of a merge: a file and, optionally, which of its pages to take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeEntry {
    pub path: PathBuf,
    pub pages: Option<String>,
}

impl MergeEntry {
    pub fn new(path: impl Into<PathBuf>, pages: Option<&str>) -> Self {
        MergeEntry {
            path: path.into(),
            pages: pages.map(str::to_string),
        }
    }
}

/// Whether the text after a `:` reads as a page range rather than part of a path
fn looks_like_range(suffix: &str) -> bool {
    suffix
        .chars()
        .all(|c| c.is_ascii_digit() || c == ',' || c == '-' || c.is_whitespace())
}

impl From<&str> for MergeEntry {
    /// Parse `file.pdf` or `file.pdf:1-3,5`.
    ///
    /// The range is taken from after the last `:`, and only when that text is
    /// made of digits, commas and dashes, so `dir:x/c.pdf` stays a path.
    fn from(s: &str) -> Self {
        match s.rsplit_once(':') {
            Some((path, pages)) if looks_like_range(pages) => MergeEntry::new(path, Some(pages)),
            _ => MergeEntry::new(s, None),
        }
    }
}

impl FromStr for MergeEntry {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(MergeEntry::from(s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergePage {
    /// Position of the entry this page came from
    pub source: usize,
    pub path: PathBuf,
    pub page: u32,
}

/// Final page order of a merged document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergePlan {
    pub pages: Vec<MergePage>,
}

/// A run of pages taken from a single merge entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub path: &'a Path,
    pub pages: Vec<u32>,
}

impl MergePlan {
    /// Pages grouped per entry, in entry order
    pub fn segments(&self) -> Vec<Segment<'_>> {
        let mut segments: Vec<Segment<'_>> = Vec::new();
        let mut current = None;
        for page in &self.pages {
            if current == Some(page.source) {
                if let Some(segment) = segments.last_mut() {
                    segment.pages.push(page.page);
                    continue;
                }
            }
            current = Some(page.source);
            segments.push(Segment {
                path: &page.path,
                pages: vec![page.page],
            });
        }
        segments
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Lay out the pages of a merged document.
///
/// `page_count` is asked for the length of each input. Every range expression
/// is parsed before it is called, so a malformed one never causes a lookup.
pub fn plan_merge<F>(entries: &[MergeEntry], mut page_count: F) -> Result<MergePlan>
where
    F: FnMut(&Path) -> Result<u32>,
{
    if entries.len() < 2 {
        return Err(Error::NotEnoughInputs(entries.len()));
    }

    let ranges = entries
        .iter()
        .map(|entry| entry.pages.as_deref().map(parse_flat).transpose())
        .collect::<Result<Vec<_>>>()?;

    let mut pages = Vec::new();
    for (source, (entry, range)) in entries.iter().zip(ranges).enumerate() {
        let total = page_count(&entry.path)?;

        let selected: Vec<u32> = match range {
            Some(range) => {
                let max = range.last().copied().unwrap_or(0);
                if max > total {
                    return Err(Error::PageOutOfRange { page: max, total });
                }
                range
            }
            None => (1..=total).collect(),
        };

        debug!(
            path = %entry.path.display(),
            pages = selected.len(),
            "planned merge input"
        );

        pages.extend(selected.into_iter().map(|page| MergePage {
            source,
            path: entry.path.clone(),
            page,
        }));
    }

    Ok(MergePlan { pages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn counts(files: &[(&str, u32)]) -> impl FnMut(&Path) -> Result<u32> {
        let map: HashMap<PathBuf, u32> = files
            .iter()
            .map(|(name, n)| (PathBuf::from(name), *n))
            .collect();
        move |path: &Path| {
            map.get(path).copied().ok_or_else(|| Error::NotFound {
                path: path.to_path_buf(),
            })
        }
    }

    fn pairs(plan: &MergePlan) -> Vec<(String, u32)> {
        plan.pages
            .iter()
            .map(|p| (p.path.display().to_string(), p.page))
            .collect()
    }

    #[test]
    fn test_parse_entry() {
        assert_eq!(MergeEntry::from("a.pdf"), MergeEntry::new("a.pdf", None));
        assert_eq!(
            MergeEntry::from("b.pdf:1-3,5"),
            MergeEntry::new("b.pdf", Some("1-3,5"))
        );
        assert_eq!(
            MergeEntry::from("dir:x/c.pdf:2"),
            MergeEntry::new("dir:x/c.pdf", Some("2"))
        );
    }

    #[test]
    fn test_colon_in_path_without_range() {
        assert_eq!(
            MergeEntry::from("dir:x/c.pdf"),
            MergeEntry::new("dir:x/c.pdf", None)
        );
        assert_eq!(
            MergeEntry::from("C:\\docs\\a.pdf"),
            MergeEntry::new("C:\\docs\\a.pdf", None)
        );
        // Still a range, so the grammar gets to reject it
        assert_eq!(
            MergeEntry::from("a.pdf:1,,2"),
            MergeEntry::new("a.pdf", Some("1,,2"))
        );
    }

    #[test]
    fn test_concatenation_order() {
        let entries = vec![
            MergeEntry::new("a.pdf", Some("2-3")),
            MergeEntry::new("b.pdf", None),
        ];
        let plan = plan_merge(&entries, counts(&[("a.pdf", 5), ("b.pdf", 2)])).unwrap();
        assert_eq!(
            pairs(&plan),
            vec![
                ("a.pdf".to_string(), 2),
                ("a.pdf".to_string(), 3),
                ("b.pdf".to_string(), 1),
                ("b.pdf".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_ranges_are_ascending_within_entry() {
        let entries = vec![
            MergeEntry::new("a.pdf", Some("5,1-2,2")),
            MergeEntry::new("b.pdf", Some("3,1")),
        ];
        let plan = plan_merge(&entries, counts(&[("a.pdf", 5), ("b.pdf", 3)])).unwrap();
        assert_eq!(
            pairs(&plan),
            vec![
                ("a.pdf".to_string(), 1),
                ("a.pdf".to_string(), 2),
                ("a.pdf".to_string(), 5),
                ("b.pdf".to_string(), 1),
                ("b.pdf".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_needs_two_entries() {
        let entries = vec![MergeEntry::new("a.pdf", None)];
        let err = plan_merge(&entries, counts(&[("a.pdf", 1)])).unwrap_err();
        assert_eq!(err, Error::NotEnoughInputs(1));

        let err = plan_merge(&[], counts(&[])).unwrap_err();
        assert_eq!(err, Error::NotEnoughInputs(0));
    }

    #[test]
    fn test_malformed_range_aborts_before_lookup() {
        let entries = vec![
            MergeEntry::new("a.pdf", None),
            MergeEntry::new("b.pdf", Some("1,,2")),
        ];
        let mut lookups = 0;
        let err = plan_merge(&entries, |_: &Path| {
            lookups += 1;
            Ok(10)
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { .. }));
        assert_eq!(lookups, 0);
    }

    #[test]
    fn test_empty_range_after_colon() {
        let entries = vec![MergeEntry::from("a.pdf:"), MergeEntry::from("b.pdf")];
        let err = plan_merge(&entries, counts(&[("a.pdf", 1), ("b.pdf", 1)])).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { .. }));
    }

    #[test]
    fn test_range_past_end_of_entry() {
        let entries = vec![
            MergeEntry::new("a.pdf", Some("1-4")),
            MergeEntry::new("b.pdf", None),
        ];
        let err = plan_merge(&entries, counts(&[("a.pdf", 3), ("b.pdf", 1)])).unwrap_err();
        assert_eq!(err, Error::PageOutOfRange { page: 4, total: 3 });
    }

    #[test]
    fn test_lookup_failure_propagates() {
        let entries = vec![MergeEntry::new("a.pdf", None), MergeEntry::new("gone.pdf", None)];
        let err = plan_merge(&entries, counts(&[("a.pdf", 1)])).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_plan_is_repeatable() {
        let entries = vec![
            MergeEntry::new("a.pdf", Some("4,1-2")),
            MergeEntry::new("b.pdf", None),
            MergeEntry::new("a.pdf", Some("3")),
        ];
        let files = [("a.pdf", 4), ("b.pdf", 2)];
        let first = plan_merge(&entries, counts(&files)).unwrap();
        let second = plan_merge(&entries, counts(&files)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.segments(), second.segments());
    }

    #[test]
    fn test_segments_split_repeated_file() {
        let entries = vec![
            MergeEntry::new("a.pdf", Some("3")),
            MergeEntry::new("a.pdf", Some("1-2")),
            MergeEntry::new("b.pdf", None),
        ];
        let plan = plan_merge(&entries, counts(&[("a.pdf", 3), ("b.pdf", 1)])).unwrap();
        let segments = plan.segments();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].pages, vec![3]);
        assert_eq!(segments[1].pages, vec![1, 2]);
        assert_eq!(segments[2].path, Path::new("b.pdf"));
        assert_eq!(plan.page_count(), 4);
    }
}
