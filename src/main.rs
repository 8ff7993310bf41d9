use anyhow::Result;
use clap::Parser;
use pdfpages::cli::{Cli, Commands};
use pdfpages::{commands, mcp};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "pdfpages=debug"
    } else {
        "pdfpages=info"
    };

    // Logs go to stderr so they never mix with stdout output or the MCP stream
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Split {
            source_file,
            pages,
            mode,
            output_dir,
        } => {
            commands::split::run(&source_file, &pages, mode, &output_dir)?;
        }
        Commands::Merge {
            output_file,
            input_files,
        } => {
            commands::merge::run(&input_files, &output_file)?;
        }
        Commands::Encrypt {
            input_file,
            password,
            new_password,
            output,
        } => {
            commands::encrypt::run(
                &input_file,
                password.as_deref(),
                new_password.as_deref(),
                output.as_deref(),
            )?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
