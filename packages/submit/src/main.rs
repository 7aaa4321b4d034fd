#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the sheet submission tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use touki_sync_sheets::SheetsClient;
use touki_sync_submit::{
    CellMap, Config, ConfigError, extract_submission, interactive, read_file, validate_layout,
    write_plan,
};

#[derive(Parser)]
#[command(name = "touki_sync_submit", about = "Property record sheet submission tool")]
struct Cli {
    /// Path to the config file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract both sources and write the combined record to the sheet
    Submit {
        /// Path to the one-page registry PDF (登記簿)
        #[arg(long)]
        pdf: PathBuf,
        /// Listing page URL
        #[arg(long)]
        url: String,
        /// Print the rendered plan without connecting or writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Check the cell layout against the target worksheet's grid
    Validate,
    /// List the field-to-cell layout
    Cells,
}

#[allow(clippy::too_many_lines)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = touki_sync_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(&cli.config).await;
    };

    match command {
        Commands::Cells => {
            // Usable without credentials: fall back to the embedded
            // layout when there is no config file yet.
            let map = match Config::load(&cli.config) {
                Ok(config) => config.cell_map()?,
                Err(ConfigError::Io { .. }) => CellMap::reference(),
                Err(e) => return Err(e.into()),
            };
            println!("{:<16} CELL", "FIELD");
            println!("{}", "-".repeat(24));
            for (field, cell) in map.entries() {
                println!("{:<16} {cell}", field.as_ref());
            }
        }
        Commands::Validate => {
            let config = Config::load(&cli.config)?;
            let map = config.cell_map()?;

            let client = SheetsClient::connect(
                &config.gcp_service_account,
                &config.sheets.spreadsheet_url,
            )
            .await?;
            let worksheet = validate_layout(&client, &map).await?;
            log::info!(
                "Layout OK: {} mapped cell(s) inside '{}' ({} rows, {} columns)",
                map.len(),
                worksheet.title,
                worksheet.row_count,
                worksheet.column_count
            );
        }
        Commands::Submit { pdf, url, dry_run } => {
            let config = Config::load(&cli.config)?;
            let map = config.cell_map()?;
            let pdf_bytes = read_file(&pdf)?;

            let spinner = touki_sync_cli_utils::step_spinner(&multi, "Extracting fields...");
            let submission = extract_submission(&pdf_bytes, &url).await?;
            spinner.finish_and_clear();

            let plan = submission.plan(&map);
            interactive::print_plan(&plan);

            if dry_run {
                log::info!("Dry run; nothing written.");
                return Ok(());
            }

            let spinner =
                touki_sync_cli_utils::step_spinner(&multi, "Connecting to the spreadsheet...");
            let client = SheetsClient::connect(
                &config.gcp_service_account,
                &config.sheets.spreadsheet_url,
            )
            .await?;
            let worksheet = validate_layout(&client, &map).await?;
            spinner.finish_and_clear();

            let written = write_plan(&client, &worksheet.title, &plan).await?;
            log::info!("Wrote {written} cell(s) to '{}'", worksheet.title);
        }
    }

    Ok(())
}
