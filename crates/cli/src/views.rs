//! Read-side commands: `missing` and `export`.

use std::io;
use std::path::{Path, PathBuf};

use pickrecon_config::ExportFormat;
use pickrecon_io::export;
use pickrecon_recon::{source_listing, view_missing, ItemSource, MissingItems, ReportId, ReportStore};

use crate::exit_codes::EXIT_MISSING_FOUND;
use crate::{create_output, ensure_parent, print_json, CliError, Context};

pub fn cmd_missing(
    ctx: &Context,
    report_id: ReportId,
    json: bool,
    csv: Option<PathBuf>,
    xlsx: Option<PathBuf>,
    save: bool,
    strict: bool,
) -> Result<(), CliError> {
    let store = ctx.open_store()?;
    let report = store.report(report_id)?;
    let missing = view_missing(&store, report_id)?;

    if let Some(path) = csv {
        write_missing(&missing, &path, ExportFormat::Csv)?;
    }
    if let Some(path) = xlsx {
        write_missing(&missing, &path, ExportFormat::Xlsx)?;
    }
    if save {
        let format = ctx.settings.export.format;
        let path = ctx
            .settings
            .export_dir()
            .join(export::missing_file_name(&report, format.extension()));
        write_missing(&missing, &path, format)?;
    }

    if json {
        print_json(&missing)?;
    } else {
        print_summary(&missing);
    }

    if strict && !missing.is_empty() {
        return Err(CliError::silent(EXIT_MISSING_FOUND));
    }
    Ok(())
}

fn print_summary(missing: &MissingItems) {
    let base = missing.missing_from.opposite();
    println!(
        "{}: {} of {} {} picks missing from {} ({} {} picks)",
        missing.report_type.label(),
        missing.ids.len(),
        missing.base_count,
        base.label(),
        missing.label(),
        missing.comparison_count,
        missing.label()
    );
    for id in &missing.ids {
        println!("{id}");
    }
}

fn write_missing(missing: &MissingItems, path: &Path, format: ExportFormat) -> Result<(), CliError> {
    match format {
        ExportFormat::Csv => export::write_missing_csv(create_output(path)?, missing)?,
        ExportFormat::Xlsx => {
            ensure_parent(path)?;
            export::write_missing_xlsx(path, missing)?;
        }
    }
    eprintln!("wrote {}", path.display());
    Ok(())
}

pub fn cmd_export(
    ctx: &Context,
    report_id: ReportId,
    source: ItemSource,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let store = ctx.open_store()?;
    let report = store.report(report_id)?;
    let picks = source_listing(&store, report_id, source)?;

    match output {
        Some(path) if path.as_os_str() == "-" => {
            export::write_source_csv(io::stdout().lock(), &picks)?;
        }
        output => {
            let path = output.unwrap_or_else(|| {
                ctx.settings
                    .export_dir()
                    .join(export::source_file_name(&report, source))
            });
            export::write_source_csv(create_output(&path)?, &picks)?;
            eprintln!("wrote {} {} picks to {}", picks.len(), source.label(), path.display());
        }
    }

    if picks.is_empty() {
        log::warn!("report {report_id} has no {} picks", source.label());
    }
    Ok(())
}
