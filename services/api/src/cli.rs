use crate::server;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use zac::config::AppConfig;
use zac::error::AppError;
use zac::zgw::IsoPeriod;

#[derive(Parser, Debug)]
#[command(
    name = "Zaakafhandelcomponent",
    about = "Run and inspect the zaakafhandelcomponent from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Load the configuration from the environment and print it with secrets redacted
    CheckConfig,
    /// Print the date an ISO-8601 period ends on, e.g. `P2M10D`
    Period(PeriodArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct PeriodArgs {
    /// ISO-8601 period with years, months, weeks and days
    period: String,
    /// Start date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::CheckConfig => {
            let config = AppConfig::load()?;
            println!("{config:#?}");
            Ok(())
        }
        Command::Period(args) => {
            println!("{}", period_end(&args)?);
            Ok(())
        }
    }
}

fn period_end(args: &PeriodArgs) -> Result<String, AppError> {
    let period = IsoPeriod::parse(&args.period)?;
    let from = args.from.unwrap_or_else(|| Local::now().date_naive());
    let end = period.add_to(from)?;
    Ok(format!(
        "{from} + {period} = {end} ({} days)",
        period.days_from(from)?
    ))
}
