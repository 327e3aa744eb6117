use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};

use client::Snapshot;
use common::constants::DEFAULT_PAGE_SIZE;
use common::{Category, Report, ReportFilter, ReportId, Role, page_count, paginate};

use super::{Command, CommandError, Context, require_role, require_session};

#[derive(Args, Debug)]
pub struct ReportsCommand {
    #[command(subcommand)]
    command: ReportsSubCommand,
}

#[derive(Args, Debug, Clone)]
struct FilterArgs {
    #[arg(long, help = "Filter by PPPK name")]
    pppk: Option<String>,
    #[arg(long, help = "Filter by month name")]
    month: Option<String>,
    #[arg(long, help = "Filter by year")]
    year: Option<String>,
    #[arg(long, help = "Filter by category")]
    category: Option<Category>,
    #[arg(long, help = "Substring search over entrepreneur names")]
    search: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> ReportFilter {
        ReportFilter {
            pppk_name: self.pppk.clone(),
            month: self.month.clone(),
            year: self.year.clone(),
            category: self.category,
            search: self.search.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
#[command(about = "Review the report collection")]
enum ReportsSubCommand {
    #[command(about = "List reports, filtered and paginated")]
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = 1, help = "1-based page number")]
        page: usize,
        #[arg(
            long = "page-size",
            default_value_t = DEFAULT_PAGE_SIZE,
            help = "Rows per page (the review view offers 5, 10, 20, 30, 40 or 50)"
        )]
        page_size: usize,
        #[arg(long, conflicts_with_all = ["page", "page_size"])]
        json: bool,
    },
    #[command(about = "Delete a report (admin only)")]
    Delete {
        #[arg(help = "Report id")]
        id: ReportId,
    },
    #[command(about = "Export filtered reports to CSV (admin only)")]
    Export {
        #[arg(short, long, help = "Output file")]
        output: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
    },
}

impl Command for ReportsCommand {
    fn execute(&self, ctx: &Context) -> Result<(), CommandError> {
        match &self.command {
            ReportsSubCommand::List {
                filters,
                page,
                page_size,
                json,
            } => {
                let session = require_session(ctx)?;
                let mut filter = filters.to_filter();
                if session.role == Role::User {
                    // History view: officers only ever see their own rows.
                    filter.pppk_name = session.identity().map(str::to_string);
                }

                let snapshot = ctx.sync.reports().fetch();
                let filtered = filter.apply(&snapshot.reports);

                if *json {
                    println!("{}", serde_json::to_string_pretty(&filtered)?);
                    return Ok(());
                }

                let rows = paginate(&filtered, *page, *page_size);
                print_report_table(rows);
                println!(
                    "Page {page} / {} ({} report(s))",
                    page_count(filtered.len(), *page_size).max(1),
                    filtered.len()
                );
                print_source(&snapshot, ctx.sync.reports().pending().len());
            }
            ReportsSubCommand::Delete { id } => {
                require_role(ctx, Role::Admin)?;
                ctx.sync.reports().delete_by_id(id)?;
                println!("Delete of {id} submitted");
                print_source_pending(ctx.sync.reports().pending().len());
            }
            ReportsSubCommand::Export { output, filters } => {
                require_role(ctx, Role::Admin)?;
                let snapshot = ctx.sync.reports().fetch();
                let filtered = filters.to_filter().apply(&snapshot.reports);
                write_csv(output, &filtered)?;
                println!("Exported {} report(s) to {}", filtered.len(), output.display());
                print_source(&snapshot, ctx.sync.reports().pending().len());
            }
        }
        Ok(())
    }
}

fn print_report_table(rows: &[&Report]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "ID",
            "Bulan",
            "Tahun",
            "PPPK",
            "Kategori",
            "Usahawan",
            "Debit (RM)",
            "Kredit (RM)",
            "Bersih (RM)",
            "Tarikh Hantar",
        ]);
    for report in rows {
        table.add_row(vec![
            Cell::new(report.id.as_str()),
            Cell::new(&report.month),
            Cell::new(&report.year),
            Cell::new(&report.pppk_name),
            Cell::new(report.category.as_str()),
            Cell::new(&report.entrepreneur_name),
            Cell::new(format!("{:.2}", report.debit)),
            Cell::new(format!("{:.2}", report.credit)),
            Cell::new(format!("{:.2}", report.net_income)),
            Cell::new(report.submitted_at.format("%d/%m/%Y").to_string()),
        ]);
    }
    println!("{table}");
}

fn print_source(snapshot: &Snapshot, pending: usize) {
    if snapshot.live {
        println!("Source: remote store (live)");
    } else {
        println!("Source: local cache (offline)");
    }
    print_source_pending(pending);
}

fn print_source_pending(pending: usize) {
    if pending > 0 {
        println!("{pending} write(s) awaiting sync confirmation");
    }
}

fn write_csv(output: &Path, reports: &[&Report]) -> Result<(), CommandError> {
    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record([
        "Bulan",
        "Tahun",
        "PPPK",
        "Kategori",
        "Usahawan",
        "Debit (RM)",
        "Kredit (RM)",
        "Pendapatan Bersih (RM)",
        "Tarikh Hantar",
    ])?;
    for report in reports {
        writer.write_record([
            report.month.clone(),
            report.year.clone(),
            report.pppk_name.clone(),
            report.category.as_str().to_string(),
            report.entrepreneur_name.clone(),
            format!("{:.2}", report.debit),
            format!("{:.2}", report.credit),
            format!("{:.2}", report.net_income),
            report.submitted_at.format("%d/%m/%Y").to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
