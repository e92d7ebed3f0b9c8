//! Commands that read a spreadsheet: `classify`, `extract`, `upload`.

use std::path::Path;

use pickrecon_io::open_sheet;
use pickrecon_recon::{accept_upload, describe, extract, ReportId};

use crate::{print_json, CliError, Context};

pub fn cmd_classify(file: &Path) -> Result<(), CliError> {
    let sheet = open_sheet(file)?;
    println!("{}", describe(&sheet));
    Ok(())
}

pub fn cmd_extract(file: &Path, json: bool) -> Result<(), CliError> {
    let sheet = open_sheet(file)?;
    let extraction = extract(&sheet)?;
    if json {
        return print_json(&extraction);
    }

    println!(
        "{} from {}: {} pick numbers",
        extraction.report_type.label(),
        extraction.source.label(),
        extraction.pick_numbers.len()
    );
    for pick in &extraction.pick_numbers {
        println!("{pick}");
    }
    Ok(())
}

pub fn cmd_upload(ctx: &Context, report_id: ReportId, file: &Path, json: bool) -> Result<(), CliError> {
    let mut store = ctx.open_store()?;
    let sheet = open_sheet(file)?;
    let receipt = accept_upload(&mut store, report_id, &sheet)?;
    if json {
        return print_json(&receipt);
    }
    println!(
        "added {} {} pick numbers to report {}",
        receipt.appended,
        receipt.source.label(),
        receipt.report_id
    );
    Ok(())
}
