//! Trading signals and the one-bar post-processing shift.

use std::fmt;

use crate::domain::error::SignalsimError;

/// Ternary trading instruction for a single bar.
///
/// The discriminants are the integer codes used at the data boundary:
/// `0` hold, `1` sell, `2` buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Signal {
    #[default]
    Hold = 0,
    Sell = 1,
    Buy = 2,
}

impl Signal {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Convert raw integer codes, rejecting anything outside {0, 1, 2}.
    pub fn from_codes(codes: &[i64]) -> Result<Vec<Signal>, SignalsimError> {
        codes.iter().map(|&c| Signal::try_from(c)).collect()
    }
}

impl TryFrom<i64> for Signal {
    type Error = SignalsimError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Signal::Hold),
            1 => Ok(Signal::Sell),
            2 => Ok(Signal::Buy),
            other => Err(SignalsimError::range(
                "signal",
                format!("{other} is not one of 0 (hold), 1 (sell), 2 (buy)"),
            )),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signal::Hold => "HOLD",
            Signal::Sell => "SELL",
            Signal::Buy => "BUY",
        };
        f.write_str(name)
    }
}

/// Delay every signal by one bar.
///
/// A signal computed from bar `t`'s price becomes actionable at bar `t + 1`:
/// the last value is dropped and `Hold` is inserted at position 0, so the
/// output has the same length as the input.
pub fn shift_signals(signals: &[Signal]) -> Vec<Signal> {
    if signals.is_empty() {
        return Vec::new();
    }
    let mut shifted = Vec::with_capacity(signals.len());
    shifted.push(Signal::Hold);
    shifted.extend_from_slice(&signals[..signals.len() - 1]);
    shifted
}
