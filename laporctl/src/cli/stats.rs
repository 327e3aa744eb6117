use clap::Args;
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};

use common::{CategorySummary, Role, current_period, summarize};

use super::{Command, CommandError, Context, require_role};

#[derive(Args, Debug)]
#[command(about = "Per-category analytics (admin only)")]
pub struct StatsCommand {
    #[arg(long)]
    json: bool,
}

impl Command for StatsCommand {
    fn execute(&self, ctx: &Context) -> Result<(), CommandError> {
        require_role(ctx, Role::Admin)?;

        let snapshot = ctx.sync.reports().fetch();
        let (month, year) = current_period();
        let summaries = summarize(&snapshot.reports, &month, &year);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
            return Ok(());
        }

        println!("Period: {month} {year}");
        print_summary_table(&summaries);
        if !snapshot.live {
            println!("Source: local cache (offline)");
        }
        Ok(())
    }
}

fn print_summary_table(summaries: &[CategorySummary]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Kategori",
            "Laporan (bulan ini)",
            "Pendapatan (bulan ini)",
            "Laporan (semua)",
            "Pendapatan (semua)",
        ]);
    for summary in summaries {
        table.add_row(vec![
            Cell::new(summary.category.as_str()),
            Cell::new(summary.current_month_count),
            Cell::new(format!("RM {:.2}", summary.current_month_income)),
            Cell::new(summary.overall_count),
            Cell::new(format!("RM {:.2}", summary.overall_income)),
        ]);
    }
    println!("{table}");
}
