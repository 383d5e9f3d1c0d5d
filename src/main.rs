use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use curl2apidoc::{web, DocPipeline, DocRequest};
use std::io::Read;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "curl2apidoc")]
#[command(about = "Generate apiDoc comments from curl commands")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the apiDoc block for one curl command
    Generate {
        /// File holding the curl command, `-` or nothing for stdin
        #[arg(long)]
        command_file: Option<PathBuf>,
        /// File holding the JSON response body
        #[arg(long)]
        response_file: Option<PathBuf>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        group: Option<String>,
        /// Value of `@apiVersion`
        #[arg(long)]
        version: Option<String>,
        /// Fail on curl options that are not understood
        #[arg(long)]
        strict: bool,
    },
    /// Start the web form
    Serve {
        #[arg(short, long, default_value = "8080", env = "CURL2APIDOC_PORT")]
        port: u16,
        #[arg(long, default_value = "127.0.0.1", env = "CURL2APIDOC_HOST")]
        host: IpAddr,
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            command_file,
            response_file,
            title,
            name,
            group,
            version,
            strict,
        } => {
            let command = match command_file.as_deref() {
                Some(path) if path != Path::new("-") => read_file(path)?,
                _ => {
                    let mut command = String::new();
                    std::io::stdin()
                        .read_to_string(&mut command)
                        .context("failed to read curl command from stdin")?;
                    command
                }
            };
            let response = response_file.as_deref().map(read_file).transpose()?;

            let request = DocRequest {
                title,
                name,
                group,
                version,
                command,
                response,
            };
            let doc = DocPipeline::strict(strict).generate(&request)?;
            for warning in &doc.warnings {
                tracing::warn!("{warning}");
            }
            println!("{}", doc.text);
        }
        Commands::Serve { port, host, strict } => {
            web::run_server(host, port, DocPipeline::strict(strict)).await?;
        }
    }

    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
