//! Split and merge PDF files by page ranges.
//!
//! Page ranges are written like `1-5,8,10-12`. [`page_range`] parses them,
//! [`plan`] turns them into page layouts for split and merge, and [`pdf`]
//! materializes those layouts with lopdf.

pub mod cli;
pub mod commands;
pub mod error;
pub mod mcp;
pub mod page_range;
pub mod pdf;
pub mod plan;
pub mod validate;

pub use error::{Error, Result};
