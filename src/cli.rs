use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::plan::{MergeEntry, SplitMode};

#[derive(Parser)]
#[command(name = "pdfpages")]
#[command(about = "Split and merge PDF files by page ranges, with MCP server support")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a PDF file into one or more files based on page ranges
    Split {
        /// Path to the source PDF file
        source_file: PathBuf,

        /// Page ranges to split on (e.g. "1-5,8-10")
        #[arg(short, long)]
        pages: String,

        /// Splitting mode: single_file (selected pages in one file),
        /// range_files (one file per range), multi_files (one file per page)
        #[arg(short, long, default_value = "single_file")]
        mode: SplitMode,

        /// Directory for the output files
        #[arg(short = 'd', long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Merge two or more PDF files into one
    Merge {
        /// Name of the merged PDF file
        #[arg(short, long)]
        output_file: PathBuf,

        /// Input file, optionally with a page range (e.g. "file2.pdf:1-3");
        /// repeat for each file, at least 2 required
        #[arg(short, long = "input-files", required = true, num_args = 1)]
        input_files: Vec<MergeEntry>,
    },

    /// Set, change or remove the password of a PDF file
    Encrypt {
        /// Path to the PDF file
        input_file: PathBuf,

        /// Current password, if the file is encrypted
        #[arg(long)]
        password: Option<String>,

        /// New password; leave out to remove the password
        #[arg(long)]
        new_password: Option<String>,

        /// Write to this file instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run as MCP server over stdio
    Mcp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_split_defaults() {
        let cli = Cli::try_parse_from(["pdfpages", "split", "test.pdf", "-p", "1-3"]).unwrap();
        match cli.command {
            Commands::Split {
                source_file,
                pages,
                mode,
                output_dir,
            } => {
                assert_eq!(source_file, PathBuf::from("test.pdf"));
                assert_eq!(pages, "1-3");
                assert_eq!(mode, SplitMode::SingleFile);
                assert_eq!(output_dir, PathBuf::from("."));
            }
            _ => panic!("expected split"),
        }
    }

    #[test]
    fn test_split_mode() {
        let cli = Cli::try_parse_from([
            "pdfpages",
            "split",
            "test.pdf",
            "--pages",
            "1,4",
            "--mode",
            "multi_files",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Split {
                mode: SplitMode::MultiFiles,
                ..
            }
        ));
    }

    #[test]
    fn test_split_unknown_mode() {
        let err = Cli::try_parse_from(["pdfpages", "split", "a.pdf", "-p", "1", "-m", "lorem"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unsupported split mode: lorem"));
    }

    #[test]
    fn test_split_requires_pages() {
        assert!(Cli::try_parse_from(["pdfpages", "split", "a.pdf"]).is_err());
        assert!(Cli::try_parse_from(["pdfpages", "split"]).is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert!(Cli::try_parse_from(["pdfpages", "lorem"]).is_err());
    }

    #[test]
    fn test_encrypt_flags() {
        let cli = Cli::try_parse_from([
            "pdfpages",
            "encrypt",
            "doc.pdf",
            "--password",
            "old",
            "--new-password",
            "new",
        ])
        .unwrap();
        match cli.command {
            Commands::Encrypt {
                input_file,
                password,
                new_password,
                output,
            } => {
                assert_eq!(input_file, PathBuf::from("doc.pdf"));
                assert_eq!(password.as_deref(), Some("old"));
                assert_eq!(new_password.as_deref(), Some("new"));
                assert_eq!(output, None);
            }
            _ => panic!("expected encrypt"),
        }

        let cli = Cli::try_parse_from(["pdfpages", "encrypt", "doc.pdf"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Encrypt {
                password: None,
                new_password: None,
                ..
            }
        ));
    }

    #[test]
    fn test_merge_entries() {
        let cli = Cli::try_parse_from([
            "pdfpages",
            "merge",
            "-o",
            "out.pdf",
            "-i",
            "a.pdf",
            "--input-files",
            "b.pdf:4,6-8",
        ])
        .unwrap();
        match cli.command {
            Commands::Merge {
                output_file,
                input_files,
            } => {
                assert_eq!(output_file, PathBuf::from("out.pdf"));
                assert_eq!(
                    input_files,
                    vec![
                        MergeEntry::new("a.pdf", None),
                        MergeEntry::new("b.pdf", Some("4,6-8")),
                    ]
                );
            }
            _ => panic!("expected merge"),
        }
    }
}
