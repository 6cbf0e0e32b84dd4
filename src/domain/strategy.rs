//! Strategy identity and parameters.
//!
//! Each supported indicator is a variant of [`Strategy`] carrying its own
//! parameters, so dispatch is an exhaustive `match` instead of a lookup by name.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::SignalsimError;
use crate::domain::validation::{validate_positive, validate_window};

pub const DEFAULT_BOLLINGER_WINDOW: usize = 20;
pub const DEFAULT_NUM_STD_DEV: f64 = 2.0;
pub const DEFAULT_MACD_SHORT: usize = 12;
pub const DEFAULT_MACD_LONG: usize = 26;
pub const DEFAULT_MACD_SIGNAL: usize = 9;
pub const DEFAULT_ROC_WINDOW: usize = 12;
pub const DEFAULT_RSI_WINDOW: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Bollinger,
    Macd,
    Roc,
    Rsi,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Bollinger,
        StrategyKind::Macd,
        StrategyKind::Roc,
        StrategyKind::Rsi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Bollinger => "bollinger",
            StrategyKind::Macd => "macd",
            StrategyKind::Roc => "roc",
            StrategyKind::Rsi => "rsi",
        }
    }

    pub fn default_strategy(self) -> Strategy {
        match self {
            StrategyKind::Bollinger => Strategy::Bollinger {
                window: DEFAULT_BOLLINGER_WINDOW,
                num_std_dev: DEFAULT_NUM_STD_DEV,
            },
            StrategyKind::Macd => Strategy::Macd {
                short_window: DEFAULT_MACD_SHORT,
                long_window: DEFAULT_MACD_LONG,
                signal_window: DEFAULT_MACD_SIGNAL,
            },
            StrategyKind::Roc => Strategy::Roc {
                window: DEFAULT_ROC_WINDOW,
            },
            StrategyKind::Rsi => Strategy::Rsi {
                window: DEFAULT_RSI_WINDOW,
            },
        }
    }
}

impl FromStr for StrategyKind {
    type Err = SignalsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bollinger" => Ok(StrategyKind::Bollinger),
            "macd" => Ok(StrategyKind::Macd),
            "roc" => Ok(StrategyKind::Roc),
            "rsi" => Ok(StrategyKind::Rsi),
            _ => Err(SignalsimError::InvalidMethod {
                method: s.trim().to_string(),
            }),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Bollinger {
        window: usize,
        num_std_dev: f64,
    },
    Macd {
        short_window: usize,
        long_window: usize,
        signal_window: usize,
    },
    Roc {
        window: usize,
    },
    Rsi {
        window: usize,
    },
}

impl Strategy {
    /// Build a strategy with default parameters from its method name.
    pub fn from_name(name: &str) -> Result<Self, SignalsimError> {
        Ok(name.parse::<StrategyKind>()?.default_strategy())
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Bollinger { .. } => StrategyKind::Bollinger,
            Strategy::Macd { .. } => StrategyKind::Macd,
            Strategy::Roc { .. } => StrategyKind::Roc,
            Strategy::Rsi { .. } => StrategyKind::Rsi,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn validate(&self) -> Result<(), SignalsimError> {
        match *self {
            Strategy::Bollinger {
                window,
                num_std_dev,
            } => {
                validate_window("window", window)?;
                validate_positive("num_std_dev", num_std_dev)
            }
            Strategy::Macd {
                short_window,
                long_window,
                signal_window,
            } => {
                validate_window("short_window", short_window)?;
                validate_window("long_window", long_window)?;
                validate_window("signal_window", signal_window)?;
                if short_window >= long_window || signal_window > short_window {
                    return Err(SignalsimError::InvalidWindowRelationship {
                        short_window,
                        long_window,
                        signal_window,
                    });
                }
                Ok(())
            }
            Strategy::Roc { window } | Strategy::Rsi { window } => {
                validate_window("window", window)
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Bollinger {
                window,
                num_std_dev,
            } => write!(f, "BOLLINGER({},{})", window, num_std_dev),
            Strategy::Macd {
                short_window,
                long_window,
                signal_window,
            } => write!(f, "MACD({},{},{})", short_window, long_window, signal_window),
            Strategy::Roc { window } => write!(f, "ROC({})", window),
            Strategy::Rsi { window } => write!(f, "RSI({})", window),
        }
    }
}
