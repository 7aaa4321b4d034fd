//! Interactive prompt flow, used when no subcommand is given.
//!
//! Prompts for the two inputs, shows the rendered plan, asks for
//! confirmation, then writes.

use std::path::Path;

use dialoguer::{Confirm, Input};

use crate::config::Config;
use crate::plan::CellWrite;

/// Runs the interactive submission flow.
///
/// # Errors
///
/// Returns an error if a prompt, extraction, layout validation, or any
/// cell write fails.
pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(config_path)?;
    let map = config.cell_map()?;

    let url: String = Input::new()
        .with_prompt("Listing page URL")
        .interact_text()?;
    let pdf_path: String = Input::new()
        .with_prompt("Registry PDF path")
        .interact_text()?;

    let pdf_bytes = crate::read_file(Path::new(pdf_path.trim()))?;
    let submission = crate::extract_submission(&pdf_bytes, url.trim()).await?;

    let plan = submission.plan(&map);
    println!();
    print_plan(&plan);
    println!();

    if !Confirm::new()
        .with_prompt("Write these cells?")
        .default(true)
        .interact()?
    {
        println!("Aborted; nothing written.");
        return Ok(());
    }

    let client = touki_sync_sheets::SheetsClient::connect(
        &config.gcp_service_account,
        &config.sheets.spreadsheet_url,
    )
    .await?;
    let worksheet = crate::validate_layout(&client, &map).await?;
    let written = crate::write_plan(&client, &worksheet.title, &plan).await?;

    println!("Wrote {written} cell(s) to '{}'.", worksheet.title);
    Ok(())
}

/// Prints a rendered plan as a `FIELD CELL VALUE` table.
pub fn print_plan(plan: &[CellWrite]) {
    println!("{:<16} {:<6} VALUE", "FIELD", "CELL");
    println!("{}", "-".repeat(50));
    for write in plan {
        // `CellRef`'s `Display` ignores width, so pad the rendered string.
        let cell = write.cell.to_string();
        println!("{:<16} {cell:<6} {}", write.field.as_ref(), write.value);
    }
}
