//! Price data access port trait.

use crate::domain::error::SignalsimError;
use crate::domain::price::PriceBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `symbol` with `start_date <= date <= end_date`, ordered by date.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SignalsimError>;

    fn list_symbols(&self) -> Result<Vec<String>, SignalsimError>;

    /// First date, last date and bar count, or `None` when the symbol has no bars.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SignalsimError>;
}
