use analytics::prepare_create;
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use configuration::{init_tracing, load_config, DEFAULT_CONFIG_PATH};
use core_types::{CreateRecordForm, RawFigures, RecordDraft};
use std::path::PathBuf;

/// The main entry point for the Fintrack financial-ratio tracker.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let settings = load_config(&args.config)?;
            let _guard = init_tracing(&settings.logging)?;
            web_server::run_server(settings).await
        }
        Commands::Migrate(args) => {
            let settings = load_config(&args.config)?;
            let _guard = init_tracing(&settings.logging)?;
            let pool = database::connect(&settings.database).await?;
            database::run_migrations(&pool).await?;
            tracing::info!("Database migrations applied.");
            Ok(())
        }
        Commands::Calc(args) => {
            let draft = prepare_create(&args.into_form())?;
            println!("{}", render_draft(&draft));
            Ok(())
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Track company financials and the ratios derived from them.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ConfigArgs),
    /// Apply database migrations and exit.
    Migrate(ConfigArgs),
    /// Normalize a set of figures and print the derived ratios, without storing anything.
    Calc(CalcArgs),
}

#[derive(Args)]
struct ConfigArgs {
    /// Path to the TOML configuration file. A missing file means defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

/// Raw figures exactly as they would be typed into the input form.
#[derive(Args)]
struct CalcArgs {
    #[arg(long)]
    sales: Option<String>,
    #[arg(long)]
    gross_profit: Option<String>,
    #[arg(long)]
    net_income: Option<String>,
    #[arg(long)]
    total_assets: Option<String>,
    #[arg(long)]
    equity: Option<String>,
    #[arg(long)]
    current_assets: Option<String>,
    #[arg(long)]
    current_liabilities: Option<String>,
    #[arg(long)]
    liabilities: Option<String>,
    #[arg(long)]
    employees: Option<String>,
    /// 1, 1000 or 1000000. Anything else is treated as 1.
    #[arg(long)]
    unit: Option<String>,
}

impl CalcArgs {
    fn into_form(self) -> CreateRecordForm {
        CreateRecordForm {
            company_name: None,
            industry: None,
            year: None,
            unit: self.unit,
            figures: RawFigures {
                sales: self.sales,
                gross_profit: self.gross_profit,
                net_income: self.net_income,
                total_assets: self.total_assets,
                equity: self.equity,
                current_assets: self.current_assets,
                current_liabilities: self.current_liabilities,
                liabilities: self.liabilities,
                employees: self.employees,
            },
        }
    }
}

fn render_draft(draft: &RecordDraft) -> Table {
    let (f, r) = (&draft.figures, &draft.ratios);
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    let rows: [(&str, String); 15] = [
        ("Sales", f.sales.to_string()),
        ("Gross profit", f.gross_profit.to_string()),
        ("Net income", f.net_income.to_string()),
        ("Total assets", f.total_assets.to_string()),
        ("Equity", f.equity.to_string()),
        ("Current assets", f.current_assets.to_string()),
        ("Current liabilities", f.current_liabilities.to_string()),
        ("Liabilities", f.liabilities.to_string()),
        ("Employees", f.employees.to_string()),
        ("Gross profit margin", r.gross_profit_margin.to_string()),
        ("ROE", r.roe.to_string()),
        ("Current ratio", r.current_ratio.to_string()),
        ("Debt ratio", r.debt_ratio.to_string()),
        ("Sales per employee", r.sales_per_employee.to_string()),
        ("Productivity", r.productivity.to_string()),
    ];
    for (metric, value) in rows {
        table.add_row(vec![metric.to_string(), value]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calc_arguments_parse_into_a_scaled_draft() {
        let cli = Cli::parse_from([
            "fintrack", "calc", "--sales", "1,000", "--gross-profit", "250", "--employees", "4",
            "--unit", "1000",
        ]);
        let Commands::Calc(args) = cli.command else {
            panic!("expected calc");
        };

        let draft = prepare_create(&args.into_form()).unwrap();
        assert_eq!(draft.figures.sales, 1_000_000.0);
        assert_eq!(draft.ratios.gross_profit_margin, 0.25);
        assert_eq!(draft.ratios.sales_per_employee, 250_000.0);

        let rendered = render_draft(&draft).to_string();
        assert!(rendered.contains("Sales per employee"));
        assert!(rendered.contains("250000"));
    }

    #[test]
    fn serve_defaults_to_config_toml() {
        let cli = Cli::parse_from(["fintrack", "serve"]);
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.config, PathBuf::from("config.toml"));
    }
}
