use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::Deserialize;
use tracing::info;

use crate::commands::merge::merge_pdf;
use crate::commands::split::split_pdf;
use crate::plan::{plan_split, MergeEntry, SplitMode};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges (e.g., '1-5,8,10-12')")]
    pub pages: String,
    #[schemars(description = "single_file, range_files or multi_files (default: single_file)")]
    #[serde(default)]
    pub mode: Option<String>,
    #[schemars(description = "Directory for the output files (default: next to the source)")]
    #[serde(default)]
    pub output_dir: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfMergeRequest {
    #[schemars(description = "Input files in order, each 'file.pdf' or 'file.pdf:1-3,5'")]
    pub inputs: Vec<String>,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfPlanSplitRequest {
    #[schemars(description = "Page ranges (e.g., '1-5,8,10-12')")]
    pub pages: String,
    #[schemars(description = "Number of pages in the source document")]
    pub total_pages: u32,
    #[schemars(description = "single_file, range_files or multi_files (default: single_file)")]
    #[serde(default)]
    pub mode: Option<String>,
}

fn parse_mode(mode: Option<&str>) -> Result<SplitMode, String> {
    mode.map_or(Ok(SplitMode::default()), |m| {
        m.parse().map_err(|e| format!("Error: {}", e))
    })
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Split a PDF into new files by page ranges. Modes: single_file puts all selected pages in one file, range_files writes one file per comma-separated range, multi_files writes one file per page.")]
    fn pdf_split(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        let mode = match parse_mode(req.mode.as_deref()) {
            Ok(m) => m,
            Err(e) => return e,
        };

        let output_dir = match req.output_dir {
            Some(dir) => std::path::PathBuf::from(dir),
            None => std::path::Path::new(&req.path)
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default(),
        };

        match split_pdf(&req.path, &req.pages, mode, &output_dir) {
            Ok(outcome) => {
                serde_json::to_string_pretty(&outcome).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Merge two or more PDFs into one. Each input is 'file.pdf' for all pages or 'file.pdf:1-3,5' for selected pages, appended in ascending page order.")]
    fn pdf_merge(&self, Parameters(req): Parameters<PdfMergeRequest>) -> String {
        let entries: Vec<MergeEntry> = req
            .inputs
            .iter()
            .map(|s| MergeEntry::from(s.as_str()))
            .collect();

        match merge_pdf(&entries, &req.output) {
            Ok(outcome) => {
                serde_json::to_string_pretty(&outcome).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {:#}", e),
        }
    }

    #[tool(description = "Preview how a page range would be split without reading or writing any file")]
    fn pdf_plan_split(&self, Parameters(req): Parameters<PdfPlanSplitRequest>) -> String {
        let mode = match parse_mode(req.mode.as_deref()) {
            Ok(m) => m,
            Err(e) => return e,
        };

        match plan_split(req.total_pages, &req.pages, mode) {
            Ok(plan) => {
                serde_json::to_string_pretty(&plan).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }
}

#[tool_handler]
impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF page tools. Page ranges look like '1-5,8,10-12': page numbers start at 1, \
                 ranges are inclusive and must not run backwards. Use pdf_plan_split to preview \
                 a split, pdf_split to write the files, and pdf_merge to combine documents."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();
    info!("starting MCP server on stdio");

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
