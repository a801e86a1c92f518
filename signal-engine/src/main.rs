use std::io;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use signal_engine::{
    generate_synthetic_series, load_file, write_csv, write_json, IndicatorConfig,
    IndicatorResult, PriceSeries, RsiIndicator, SmaCrossoverIndicator,
};

#[derive(Parser, Debug)]
#[command(name = "signal-engine")]
#[command(version = "0.1.0")]
#[command(about = "RSI and SMA crossover signals for daily close prices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    input: InputArgs,
}

#[derive(ClapArgs, Debug)]
struct InputArgs {
    /// Data file path (CSV/JSON). If not provided, uses synthetic data.
    #[arg(short = 'f', long, global = true)]
    data_file: Option<PathBuf>,

    /// Number of days of synthetic data
    #[arg(short, long, default_value = "300", global = true)]
    days: usize,

    /// Initial price for synthetic data
    #[arg(long, default_value = "50.0", global = true)]
    initial_price: f64,

    /// JSON file with indicator parameters
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (json, csv, text)
    #[arg(short, long, default_value = "json", global = true)]
    output: String,

    /// Pretty print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Only emit Date, Close and SignalValue
    #[arg(long, global = true)]
    numeric_only: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Relative Strength Index with Buy/Sell/Hold labels
    Rsi {
        /// Smoothing span
        #[arg(long)]
        time_period: Option<usize>,

        /// RSI above this level is Sell
        #[arg(long)]
        overbought: Option<f64>,

        /// RSI below this level is Buy
        #[arg(long)]
        oversold: Option<f64>,
    },
    /// Short/long moving-average spread with buy/sell/hold labels
    SmaCrossover {
        /// Short trend window in days
        #[arg(long)]
        short_period: Option<usize>,

        /// Long trend window in days
        #[arg(long)]
        long_period: Option<usize>,

        /// Spread threshold
        #[arg(long)]
        threshold: Option<f64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let input = &cli.input;

    let mut config = match &input.config {
        Some(path) => {
            info!(path = %path.display(), "loading indicator config");
            IndicatorConfig::from_json_file(path)?
        }
        None => IndicatorConfig::default(),
    };

    let series = load_series(input)?;
    info!(
        bars = series.len(),
        from = %series.first_date(),
        to = %series.last_date(),
        "price data ready"
    );

    let result = match cli.command {
        Command::Rsi {
            time_period,
            overbought,
            oversold,
        } => {
            let params = &mut config.rsi;
            if let Some(period) = time_period {
                params.time_period = period;
            }
            if let Some(level) = overbought {
                params.overbought_level = level;
            }
            if let Some(level) = oversold {
                params.oversold_level = level;
            }

            let indicator = RsiIndicator::new(params.clone())?;
            if input.numeric_only {
                indicator.numeric_table(&series)
            } else {
                indicator.signal_table(&series)
            }
        }
        Command::SmaCrossover {
            short_period,
            long_period,
            threshold,
        } => {
            let params = &mut config.sma_crossover;
            if let Some(period) = short_period {
                params.short_trend_period = period;
            }
            if let Some(period) = long_period {
                params.long_trend_period = period;
            }
            if let Some(value) = threshold {
                params.threshold = value;
            }

            let indicator = SmaCrossoverIndicator::new(params.clone())?;
            if input.numeric_only {
                indicator.numeric_table(&series)
            } else {
                indicator.signal_table(&series)
            }
        }
    };

    info!(indicator = %result.indicator, rows = result.len(), "signals computed");

    match input.output.as_str() {
        "json" => {
            write_json(&result, io::stdout().lock(), input.pretty)?;
            println!();
        }
        "csv" => write_csv(&result, io::stdout().lock())?,
        "text" => print_text_report(&result),
        other => bail!("Unknown output format: {}", other),
    }

    Ok(())
}

fn load_series(input: &InputArgs) -> Result<PriceSeries> {
    if let Some(path) = &input.data_file {
        info!(path = %path.display(), "loading price data");
        return Ok(load_file(path)?);
    }

    info!(
        days = input.days,
        initial_price = input.initial_price,
        "generating synthetic price data"
    );
    Ok(generate_synthetic_series(input.days, input.initial_price))
}

fn print_text_report(result: &IndicatorResult) {
    println!();
    println!("================================================================");
    println!("  SIGNALS - {}", result.indicator);
    println!("================================================================");
    println!("  {:<12} {:>12} {:>14} {:>10}", "Date", "Close", "SignalValue", "Position");
    println!("----------------------------------------------------------------");

    for row in &result.rows {
        let value = row
            .signal_value
            .map(|v| format!("{:.4}", v))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<12} {:>12.4} {:>14} {:>10}",
            row.date.format("%Y-%m-%d"),
            row.close,
            value,
            row.signal_position.as_deref().unwrap_or("")
        );
    }

    let positions = result.signal_positions();
    let count = |label: &str| {
        positions
            .iter()
            .filter(|p| p.is_some_and(|p| p.eq_ignore_ascii_case(label)))
            .count()
    };

    println!("----------------------------------------------------------------");
    println!(
        "  Buy: {}   Sell: {}   Hold: {}",
        count("buy"),
        count("sell"),
        count("hold")
    );
    println!("================================================================");
}
