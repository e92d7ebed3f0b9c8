//! `pickrecon report` - lifecycle of logical reports.

use chrono::NaiveDate;
use clap::Subcommand;
use serde::Serialize;

use pickrecon_recon::{
    counterpart_report, infer_source, ItemSource, LogicalReport, NewReport, ReportId, ReportStore,
};

use crate::{parse_date, print_json, CliError, Context, TypeArg};

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Create a report for one (type, date)
    #[command(after_help = "\
Examples:
  pickrecon report create --type open --date 2026-01-20
  pickrecon report create --type shipped --date 2026-01-20 --manual --name 'late recount'")]
    Create {
        #[arg(long = "type", value_enum)]
        report_type: TypeArg,

        /// Business date, YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,

        #[arg(long)]
        name: Option<String>,

        /// Manual reports are exempt from the one-per-(type, date) rule
        #[arg(long)]
        manual: bool,

        #[arg(long)]
        json: bool,
    },

    /// List reports, newest date first
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show a report with its per-source pick counts
    Show {
        id: i64,

        #[arg(long)]
        json: bool,
    },

    /// Close a report; closed reports accept no further uploads
    Close { id: i64 },

    /// Delete a report and all of its picks
    Delete { id: i64 },
}

pub fn cmd_report(ctx: &Context, cmd: ReportCommands) -> Result<(), CliError> {
    match cmd {
        ReportCommands::Create { report_type, date, name, manual, json } => {
            let new = NewReport {
                name: name.unwrap_or_default(),
                report_type: report_type.into(),
                date,
                is_manual: manual,
            };
            let report = ctx.open_store()?.create_report(&new)?;
            if json {
                print_json(&report)
            } else {
                println!("created report {}: {report}", report.id);
                Ok(())
            }
        }
        ReportCommands::List { json } => cmd_list(ctx, json),
        ReportCommands::Show { id, json } => cmd_show(ctx, ReportId(id), json),
        ReportCommands::Close { id } => {
            let report = ctx.open_store()?.close_report(ReportId(id))?;
            println!("closed report {}: {report}", report.id);
            Ok(())
        }
        ReportCommands::Delete { id } => {
            ctx.open_store()?.delete_report(ReportId(id))?;
            println!("deleted report {id}");
            Ok(())
        }
    }
}

fn cmd_list(ctx: &Context, json: bool) -> Result<(), CliError> {
    let reports = ctx.open_store()?.reports()?;
    if json {
        return print_json(&reports);
    }
    if reports.is_empty() {
        println!("no reports");
        return Ok(());
    }

    println!("{:>5}  {:<8} {:<10}  {:<6} {:<6}  NAME", "ID", "TYPE", "DATE", "STATUS", "KIND");
    for r in &reports {
        println!(
            "{:>5}  {:<8} {:<10}  {:<6} {:<6}  {}",
            r.id.0,
            r.report_type.code(),
            r.date,
            r.status.code(),
            if r.is_manual { "manual" } else { "auto" },
            r.name
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct ReportDetail {
    report: LogicalReport,
    full_circle_picks: usize,
    wms_picks: usize,
    /// Source of the most recent upload.
    latest_source: Option<ItemSource>,
    /// Another report of the same (type, date) holding the opposite source.
    counterpart: Option<ReportId>,
}

fn cmd_show(ctx: &Context, id: ReportId, json: bool) -> Result<(), CliError> {
    let store = ctx.open_store()?;
    let report = store.report(id)?;
    let detail = ReportDetail {
        full_circle_picks: store.picks(id, Some(ItemSource::FullCircle))?.len(),
        wms_picks: store.picks(id, Some(ItemSource::Wms))?.len(),
        latest_source: infer_source(&store, id)?,
        counterpart: counterpart_report(&store, &report)?.map(|r| r.id),
        report,
    };
    if json {
        return print_json(&detail);
    }

    let r = &detail.report;
    println!("report {}: {r}", r.id);
    println!("  type:        {}", r.report_type.label());
    println!("  date:        {}", r.date);
    println!("  status:      {}", r.status.label());
    println!("  manual:      {}", if r.is_manual { "yes" } else { "no" });
    println!("  created:     {}", r.created.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Full Circle: {} picks", detail.full_circle_picks);
    println!("  WMS:         {} picks", detail.wms_picks);
    if let Some(source) = detail.latest_source {
        println!("  last upload: {}", source.label());
    }
    if let Some(other) = detail.counterpart {
        println!("  counterpart: report {other}");
    }
    Ok(())
}
