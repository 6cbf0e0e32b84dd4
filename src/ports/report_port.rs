//! Report generation port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::SignalsimError;
use crate::domain::price::PriceBar;

/// Port for writing backtest reports.
pub trait ReportPort {
    /// Write `result` alongside the `bars` it was simulated on.
    fn write(
        &self,
        result: &BacktestResult,
        bars: &[PriceBar],
        output_path: &str,
    ) -> Result<(), SignalsimError>;
}
