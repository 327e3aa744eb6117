use clap::Args;

use common::{Category, ReportDraft, Role};

use super::{Command, CommandError, Context, require_role};

#[derive(Args, Debug)]
#[command(about = "Submit a monthly income report")]
pub struct SubmitCommand {
    #[arg(long, help = "Reporting month name, e.g. Mac")]
    month: String,
    #[arg(long, help = "Reporting year, e.g. 2026")]
    year: String,
    #[arg(long, help = "Business category (Usahawan, Agromakanan, Agro TS)")]
    category: Category,
    #[arg(long = "entrepreneur", help = "Entrepreneur being reported on")]
    entrepreneur_name: String,
    #[arg(long, help = "Gross income (RM)")]
    debit: f64,
    #[arg(long, help = "Expenses (RM)")]
    credit: f64,
    #[arg(long = "document-url", help = "Supporting document reference")]
    document_url: Option<String>,
}

impl Command for SubmitCommand {
    fn execute(&self, ctx: &Context) -> Result<(), CommandError> {
        let session = require_role(ctx, Role::User)?;
        let pppk_name = session
            .identity()
            .ok_or_else(|| CommandError::Generic("Session has no staff name".to_string()))?
            .to_string();

        let report = ReportDraft {
            pppk_name,
            month: self.month.clone(),
            year: self.year.clone(),
            category: self.category,
            entrepreneur_name: self.entrepreneur_name.clone(),
            debit: self.debit,
            credit: self.credit,
            document_url: self.document_url.clone(),
        }
        .submit();

        println!("Report {} submitted", report.id);
        println!("Net income: RM {:.2}", report.net_income);

        ctx.sync.reports().add(report)?;

        let pending = ctx.sync.reports().pending().len();
        println!("{pending} write(s) awaiting sync confirmation");
        Ok(())
    }
}
