//! Command-line access to the impanel review backend

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use comfy_table::{Cell, ContentArrangement, Table};

use impanel_client::ReviewClient;
use impanel_core::{
    export_markdown, CatalogSource, CommentId, CommentStore, DocumentUpload, ImpanelConfig,
};

#[derive(Parser)]
#[command(
    name = "impanel",
    version,
    about = "Design review comments from the command line"
)]
struct Cli {
    /// Backend base URL, overriding config file and environment
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the project / device / page catalog
    Catalog,
    /// List comments for one (project, device) pair
    Comments { project: String, device: String },
    /// Print the markdown export for one (project, device) pair
    Export { project: String, device: String },
    /// Upload a PDF document for review
    Upload { path: PathBuf },
    /// Delete comments by id, reporting each outcome
    Delete { ids: Vec<i64> },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = ImpanelConfig::load()?;
    if let Some(backend) = cli.backend {
        config.backend.base_url = backend;
    }
    let client = ReviewClient::from_config(&config)?;

    match cli.command {
        Command::Catalog => {
            let catalog = client.fetch_catalog().await?;
            let mut table = Table::new();
            table
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Project", "Device", "Pages"]);
            for project in catalog.projects() {
                for device in catalog.devices(project) {
                    let pages: Vec<&str> = catalog
                        .pages(project, device)
                        .iter()
                        .map(|p| p.name.as_str())
                        .collect();
                    table.add_row(vec![
                        Cell::new(project),
                        Cell::new(device),
                        Cell::new(pages.join(", ")),
                    ]);
                }
            }
            println!("{table}");
        }
        Command::Comments { project, device } => {
            let comments = client.list_comments(&project, &device).await?;
            if comments.is_empty() {
                println!("No comments for {}/{}", project, device);
                return Ok(());
            }
            let mut table = Table::new();
            table
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Id", "Page", "Component", "Comment", "Created"]);
            for c in &comments {
                let page = match c.page_number {
                    Some(n) => format!("{} (p{})", c.page_name, n),
                    None => c.page_name.clone(),
                };
                table.add_row(vec![
                    Cell::new(c.id),
                    Cell::new(page),
                    Cell::new(&c.ui_component),
                    Cell::new(&c.body),
                    Cell::new(c.created_at.format("%Y-%m-%d %H:%M")),
                ]);
            }
            println!("{table}");
        }
        Command::Export { project, device } => {
            let comments = client.list_comments(&project, &device).await?;
            println!("{}", export_markdown(&comments));
        }
        Command::Upload { path } => {
            let bytes = std::fs::read(&path)?;
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload.pdf");
            let document = client.upload_document(filename, bytes).await?;
            println!("Uploaded as {}", document.filename);
        }
        Command::Delete { ids } => {
            for raw in ids {
                let id = CommentId::new(raw);
                match client.delete_comment(id).await {
                    Ok(()) => println!("Deleted {}", id),
                    Err(err) => eprintln!("Failed to delete {}: {}", id, err),
                }
            }
        }
    }

    Ok(())
}
