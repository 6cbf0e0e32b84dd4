//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{BacktestResult, TradingConfig};
use crate::domain::batch::{run_batch, BacktestJob, BatchOutcome};
use crate::domain::config_validation as settings;
use crate::domain::error::SignalsimError;
use crate::domain::indicator::generate_signals;
use crate::domain::price::{PriceBar, PriceField};
use crate::domain::strategy::{Strategy, StrategyKind};
use crate::domain::universe::{parse_symbols, validate_universe};
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "signalsim", about = "Indicator signal backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Backtest every configured (symbol, method) pair
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Run a single symbol instead of [data] symbols
        #[arg(long)]
        symbol: Option<String>,
        /// Run a single method instead of [strategy] methods
        #[arg(long)]
        method: Option<String>,
        /// Output directory, overrides [report] output_dir
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the shifted signal series for one symbol and method
    Signals {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        method: String,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            symbol,
            method,
            output,
            dry_run,
        } => run_backtest(
            &config,
            symbol.as_deref(),
            method.as_deref(),
            output.as_deref(),
            dry_run,
        ),
        Command::Signals {
            config,
            symbol,
            method,
        } => run_signals(&config, &symbol, &method),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SignalsimError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Everything a backtest run needs, resolved from config and CLI overrides.
#[derive(Debug)]
pub struct RunPlan {
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub symbols: Vec<String>,
    pub strategies: Vec<Strategy>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub job: JobSettings,
}

/// The per-job settings shared by every (symbol, strategy) pair.
#[derive(Debug, Clone, Copy)]
pub struct JobSettings {
    pub config: TradingConfig,
    pub field: PriceField,
    pub risk_free_rate: f64,
}

pub fn build_plan(
    adapter: &FileConfigAdapter,
    symbol_override: Option<&str>,
    method_override: Option<&str>,
    output_override: Option<&Path>,
) -> Result<RunPlan, SignalsimError> {
    settings::validate_config(adapter)?;

    let symbols = match symbol_override {
        Some(s) => parse_symbols(s).map_err(|e| SignalsimError::range("--symbol", e.to_string()))?,
        None => settings::symbols(adapter)?,
    };
    let kinds = match method_override {
        Some(m) => vec![m.parse::<StrategyKind>()?],
        None => settings::methods(adapter)?,
    };
    let strategies = kinds
        .into_iter()
        .map(|k| settings::strategy_for(adapter, k))
        .collect::<Result<Vec<_>, _>>()?;
    let (start_date, end_date) = settings::date_range(adapter)?;

    Ok(RunPlan {
        data_path: PathBuf::from(settings::data_path(adapter)),
        output_dir: output_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(settings::output_dir(adapter))),
        symbols,
        strategies,
        start_date,
        end_date,
        job: JobSettings {
            config: settings::trading_config(adapter)?,
            field: settings::price_field(adapter)?,
            risk_free_rate: settings::risk_free_rate(adapter)?,
        },
    })
}

/// `<SYMBOL>_<start>_<end>_<method>.csv`
pub fn output_file_name(symbol: &str, start: NaiveDate, end: NaiveDate, strategy: &Strategy) -> String {
    format!("{symbol}_{start}_{end}_{}.csv", strategy.name())
}

fn run_backtest(
    config_path: &Path,
    symbol_override: Option<&str>,
    method_override: Option<&str>,
    output_override: Option<&Path>,
    dry_run: bool,
) -> Result<(), SignalsimError> {
    let adapter = load_config(config_path)?;
    let plan = build_plan(&adapter, symbol_override, method_override, output_override)?;

    if dry_run {
        print_plan(&plan);
        return Ok(());
    }

    let data_port = CsvAdapter::new(plan.data_path.clone());
    run_backtest_pipeline(&data_port, &CsvReportAdapter::new(), &plan)
}

fn print_plan(plan: &RunPlan) {
    let job = &plan.job;
    eprintln!("Configuration is valid");
    eprintln!("\nData:");
    eprintln!("  path:    {}", plan.data_path.display());
    eprintln!("  symbols: {}", plan.symbols.join(", "));
    eprintln!("  range:   {} to {}", plan.start_date, plan.end_date);
    eprintln!("  field:   {}", job.field);
    eprintln!("\nTrading:");
    eprintln!("  initial cash: {:.2}", job.config.initial_cash);
    eprintln!("  cost rate:    {}", job.config.cost_rate);
    eprintln!("  trade pct:    {}", job.config.trade_pct);
    eprintln!("\nStrategies:");
    for strategy in &plan.strategies {
        eprintln!("  {strategy}");
    }
    eprintln!("\nDry run complete: {} runs planned", plan.symbols.len() * plan.strategies.len());
}

/// Validate symbols, fetch bars, run every job and write one report per run.
///
/// Failing runs are reported and skipped; the first failure decides the error.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    plan: &RunPlan,
) -> Result<(), SignalsimError> {
    let mut validation = validate_universe(
        data_port,
        plan.symbols.clone(),
        plan.start_date,
        plan.end_date,
    )?;

    let mut bars_by_symbol: HashMap<String, Arc<[PriceBar]>> = HashMap::new();
    let mut jobs = Vec::new();
    for symbol in &validation.universe.symbols {
        let Some(bars) = validation.bars.remove(symbol) else {
            continue;
        };
        let bars: Arc<[PriceBar]> = bars.into();
        for strategy in &plan.strategies {
            jobs.push(BacktestJob {
                symbol: symbol.clone(),
                strategy: strategy.clone(),
                bars: Arc::clone(&bars),
                config: plan.job.config,
                field: plan.job.field,
                risk_free_rate: plan.job.risk_free_rate,
            });
        }
        bars_by_symbol.insert(symbol.clone(), bars);
    }

    info!(
        jobs = jobs.len(),
        start = %plan.start_date,
        end = %plan.end_date,
        "running backtests"
    );
    let outcomes = run_batch(jobs);

    let mut first_error: Option<SignalsimError> = None;
    for outcome in outcomes {
        let BatchOutcome {
            symbol,
            strategy,
            result,
        } = outcome;
        let result = match result {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {symbol} {strategy}: {e}");
                first_error.get_or_insert(e);
                continue;
            }
        };

        print_summary(&symbol, &result);

        let Some(bars) = bars_by_symbol.get(&symbol) else {
            continue;
        };
        let path = plan
            .output_dir
            .join(output_file_name(&symbol, plan.start_date, plan.end_date, &strategy));
        match report_port.write(&result, bars, &path.to_string_lossy()) {
            Ok(()) => eprintln!("  Report written to: {}", path.display()),
            Err(e) => {
                eprintln!("error: {e}");
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn print_summary(symbol: &str, result: &BacktestResult) {
    let m = &result.metrics;
    eprintln!("\n=== {} {} ===", symbol, result.strategy);
    eprintln!("Final Assets:     {:.2}", result.portfolio.final_assets());
    eprintln!("Total Return:     {:.2}%", m.total_return * 100.0);
    eprintln!("Annualized:       {:.2}%", m.annualized_return * 100.0);
    eprintln!("Volatility:       {:.2}%", m.annualized_volatility * 100.0);
    eprintln!("Sharpe Ratio:     {:.2}", m.sharpe_ratio);
    eprintln!("Max Drawdown:     -{:.1}%", m.max_drawdown * 100.0);
    eprintln!("Trades:           {}", m.trades);
    eprintln!(
        "Buy and Hold:     {:.2}%",
        m.buy_and_hold.total_return * 100.0
    );
}

fn run_signals(config_path: &Path, symbol: &str, method: &str) -> Result<(), SignalsimError> {
    let adapter = load_config(config_path)?;
    settings::validate_data_config(&adapter)?;

    let strategy = settings::strategy_for(&adapter, method.parse()?)?;
    let field = settings::price_field(&adapter)?;
    let (start, end) = settings::date_range(&adapter)?;

    let data_port = CsvAdapter::new(PathBuf::from(settings::data_path(&adapter)));
    let bars = data_port.fetch_prices(symbol, start, end)?;
    if bars.is_empty() {
        return Err(SignalsimError::NoData {
            symbol: symbol.to_string(),
        });
    }

    let signals = generate_signals(&bars, &strategy, field)?;
    println!("date,price,signal");
    for (bar, signal) in bars.iter().zip(&signals) {
        println!("{},{},{}", bar.date, bar.price(field), signal.code());
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), SignalsimError> {
    let adapter = load_config(config_path)?;
    settings::validate_config(&adapter)?;
    eprintln!("Configuration is valid");
    Ok(())
}

fn run_list_symbols(config_path: &Path) -> Result<(), SignalsimError> {
    let adapter = load_config(config_path)?;
    let data_port = CsvAdapter::new(PathBuf::from(settings::data_path(&adapter)));

    let symbols = data_port.list_symbols()?;
    if symbols.is_empty() {
        eprintln!("No symbols found in {}", settings::data_path(&adapter));
    }
    for symbol in &symbols {
        match data_port.get_data_range(symbol)? {
            Some((first, last, count)) => println!("{symbol}\t{first}\t{last}\t{count}"),
            None => println!("{symbol}\t-\t-\t0"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_file_name_format() {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(
            output_file_name("AAPL", start, end, &StrategyKind::Macd.default_strategy()),
            "AAPL_2022-01-01_2025-01-01_macd.csv"
        );
    }

    #[test]
    fn plan_applies_overrides() {
        let adapter = FileConfigAdapter::from_string(
            "[data]\nsymbols = AAPL,MSFT\nstart_date = 2022-01-01\nend_date = 2023-01-01\n\
             [backtest]\ninitial_cash = 1000\n[rsi]\nwindow = 7\n[report]\noutput_dir = out\n",
        )
        .unwrap();

        let plan = build_plan(&adapter, Some("GOOG"), Some("rsi"), Some(Path::new("elsewhere"))).unwrap();
        assert_eq!(plan.symbols, vec!["GOOG"]);
        assert_eq!(plan.strategies, vec![Strategy::Rsi { window: 7 }]);
        assert_eq!(plan.output_dir, PathBuf::from("elsewhere"));

        let plan = build_plan(&adapter, None, None, None).unwrap();
        assert_eq!(plan.symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(plan.strategies.len(), 4);
        assert_eq!(plan.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn plan_rejects_unsafe_symbol_override() {
        let adapter = FileConfigAdapter::from_string(
            "[data]\nsymbols = AAPL\nstart_date = 2022-01-01\nend_date = 2023-01-01\n\
             [backtest]\ninitial_cash = 1000\n",
        )
        .unwrap();
        for bad in ["", "  ", "../secrets", "a/b"] {
            let err = build_plan(&adapter, Some(bad), None, None).unwrap_err();
            assert!(
                matches!(err, SignalsimError::InvalidInputRange { ref name, .. } if name == "--symbol"),
                "{bad:?} gave {err:?}"
            );
        }
        let plan = build_plan(&adapter, Some(" MSFT, GOOG "), None, None).unwrap();
        assert_eq!(plan.symbols, vec!["MSFT", "GOOG"]);
    }

    #[test]
    fn plan_rejects_unknown_method_override() {
        let adapter = FileConfigAdapter::from_string(
            "[data]\nsymbols = AAPL\nstart_date = 2022-01-01\nend_date = 2023-01-01\n\
             [backtest]\ninitial_cash = 1000\n",
        )
        .unwrap();
        let err = build_plan(&adapter, None, Some("sma"), None).unwrap_err();
        assert!(matches!(err, SignalsimError::InvalidMethod { .. }));
    }

    #[test]
    fn cli_parses_backtest_flags() {
        let cli = Cli::try_parse_from([
            "signalsim", "backtest", "-c", "cfg.ini", "--symbol", "AAPL", "--method", "roc", "-o",
            "out", "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Command::Backtest {
                config,
                symbol,
                method,
                output,
                dry_run,
            } => {
                assert_eq!(config, PathBuf::from("cfg.ini"));
                assert_eq!(symbol.as_deref(), Some("AAPL"));
                assert_eq!(method.as_deref(), Some("roc"));
                assert_eq!(output, Some(PathBuf::from("out")));
                assert!(dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
