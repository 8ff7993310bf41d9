use crate::error::{Error, Result};
use std::ops::RangeInclusive;
use std::str::FromStr;

/// One comma-separated unit of a page range expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Single(u32),
    Span { start: u32, end: u32 },
}

impl PageToken {
    /// Parse a single token like "5" or "2-7".
    ///
    /// `expression` is the full text the token came from, used for error messages.
    fn parse(token: &str, expression: &str) -> Result<Self> {
        if token.is_empty() {
            return Err(Error::format(expression, "empty page range"));
        }

        match token.split_once('-') {
            Some((start, end)) => {
                if start.is_empty() {
                    return Err(Error::format(
                        expression,
                        format!("invalid page range '{}'", token),
                    ));
                }
                if end.contains('-') {
                    return Err(Error::format(
                        expression,
                        format!("too many hyphens in '{}'", token),
                    ));
                }

                let start = parse_page_number(start, expression)?;
                let end = parse_page_number(end, expression)?;

                // Reversed spans used to expand to nothing and silently drop pages
                if start > end {
                    return Err(Error::format(
                        expression,
                        format!("range start {} is greater than range end {}", start, end),
                    ));
                }

                Ok(PageToken::Span { start, end })
            }
            None => Ok(PageToken::Single(parse_page_number(token, expression)?)),
        }
    }

    /// 1-based pages covered by this token, ascending
    pub fn pages(&self) -> RangeInclusive<u32> {
        match *self {
            PageToken::Single(n) => n..=n,
            PageToken::Span { start, end } => start..=end,
        }
    }

    pub fn last(&self) -> u32 {
        match *self {
            PageToken::Single(n) => n,
            PageToken::Span { end, .. } => end,
        }
    }
}

/// A parsed page range expression such as "1-5,8,10-12".
///
/// Token order is kept as written; duplicates across tokens are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRangeExpr {
    tokens: Vec<PageToken>,
}

impl PageRangeExpr {
    /// Parse a comma-separated list of page ranges.
    ///
    /// No whitespace is accepted anywhere, page numbers start at 1 and have no
    /// leading zeros, and a span must not run backwards.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::format(s, "empty page range"));
        }

        let tokens = s
            .split(',')
            .map(|token| PageToken::parse(token, s))
            .collect::<Result<Vec<_>>>()?;

        Ok(PageRangeExpr { tokens })
    }

    pub fn tokens(&self) -> &[PageToken] {
        &self.tokens
    }

    /// Highest page referenced anywhere in the expression
    pub fn max_page(&self) -> u32 {
        self.tokens.iter().map(PageToken::last).max().unwrap_or(0)
    }

    /// Union of every token's pages, ascending and deduplicated
    pub fn flatten(&self) -> Vec<u32> {
        let mut pages: Vec<u32> = self.tokens.iter().flat_map(PageToken::pages).collect();
        pages.sort_unstable();
        pages.dedup();
        pages
    }

    /// One ascending page list per token, in the order the tokens were written
    pub fn groups(&self) -> Vec<Vec<u32>> {
        self.tokens
            .iter()
            .map(|token| token.pages().collect())
            .collect()
    }
}

impl FromStr for PageRangeExpr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PageRangeExpr::parse(s)
    }
}

fn parse_page_number(s: &str, expression: &str) -> Result<u32> {
    if s.is_empty() {
        return Err(Error::format(expression, "missing page number"));
    }

    if let Some(c) = s.chars().find(|c| !c.is_ascii_digit()) {
        return Err(Error::format(
            expression,
            format!("unexpected character '{}'", c),
        ));
    }

    if s.starts_with('0') {
        return Err(Error::format(
            expression,
            format!("page number '{}' must start with a digit from 1 to 9", s),
        ));
    }

    s.parse::<u32>()
        .map_err(|_| Error::format(expression, format!("page number '{}' is too large", s)))
}

/// Check that `s` is a well-formed page range expression
pub fn validate(s: &str) -> Result<()> {
    PageRangeExpr::parse(s).map(|_| ())
}

/// Parse a page range string into one ascending, deduplicated list of pages
pub fn parse_flat(s: &str) -> Result<Vec<u32>> {
    Ok(PageRangeExpr::parse(s)?.flatten())
}

/// Parse a page range string into one ascending page list per comma-separated token
pub fn parse_grouped(s: &str) -> Result<Vec<Vec<u32>>> {
    Ok(PageRangeExpr::parse(s)?.groups())
}
