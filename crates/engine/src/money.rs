use std::{
    fmt,
    ops::{Add, Sub},
};

use crate::{Currency, EngineError, ResultEngine};

/// Money amount represented as **integer paise**.
///
/// Use this type for monetary arithmetic in the engine (balances, goal
/// savings, split shares) to avoid floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "₹12.34");
/// ```
///
/// Even shares are rounded half-up to the paisa:
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!(MoneyCents::new(100_00).split_even(3).unwrap().cents(), 33_33);
/// assert_eq!(MoneyCents::new(1_00).split_even(8).unwrap().cents(), 13);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer paise.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in paise.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Share of `self` for each of `parts` people, rounded half-up to the
    /// paisa.
    ///
    /// The sum of the shares may differ from `self` by at most `parts / 2`
    /// paise; callers report that difference instead of hiding it.
    pub fn split_even(self, parts: usize) -> ResultEngine<MoneyCents> {
        if parts == 0 {
            return Err(EngineError::InvalidInput(
                "cannot split between 0 people".to_string(),
            ));
        }
        if self.0 <= 0 {
            return Err(EngineError::InvalidAmount(
                "split amount must be > 0".to_string(),
            ));
        }
        let parts = i64::try_from(parts)
            .map_err(|_| EngineError::InvalidInput("too many people".to_string()))?;

        // round(total / parts) == floor((2 * total + parts) / (2 * parts)) for total > 0
        let doubled = self
            .0
            .checked_mul(2)
            .and_then(|v| v.checked_add(parts))
            .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))?;
        Ok(MoneyCents(doubled / (2 * parts)))
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let rupees = abs / 100;
        let paise = abs % 100;
        write!(f, "{sign}{}{rupees}.{paise:02}", Currency::Inr.symbol())
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_inr() {
        assert_eq!(MoneyCents::new(0).to_string(), "₹0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "₹0.01");
        assert_eq!(MoneyCents::new(1050).to_string(), "₹10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-₹10.50");
    }

    #[test]
    fn split_even_rounds_half_up() {
        assert_eq!(MoneyCents::new(9000).split_even(3).unwrap().cents(), 3000);
        assert_eq!(MoneyCents::new(10000).split_even(3).unwrap().cents(), 3333);
        assert_eq!(MoneyCents::new(20000).split_even(3).unwrap().cents(), 6667);
        assert_eq!(MoneyCents::new(5).split_even(2).unwrap().cents(), 3);
        assert_eq!(MoneyCents::new(1).split_even(1).unwrap().cents(), 1);
    }

    #[test]
    fn split_even_drift_is_bounded() {
        for total in [1_i64, 7, 100, 9999, 10000, 123_457] {
            for parts in 1..=12_usize {
                let share = MoneyCents::new(total).split_even(parts).unwrap().cents();
                let drift = (total - share * parts as i64).abs();
                assert!(drift * 2 <= parts as i64, "total={total} parts={parts}");
            }
        }
    }

    #[test]
    fn checked_add_reports_overflow() {
        assert_eq!(
            MoneyCents::new(40).checked_add(MoneyCents::new(2)),
            Some(MoneyCents::new(42))
        );
        assert_eq!(MoneyCents::new(i64::MAX).checked_add(MoneyCents::new(1)), None);
    }

    #[test]
    fn split_even_rejects_invalid_input() {
        assert!(MoneyCents::new(100).split_even(0).is_err());
        assert!(MoneyCents::new(0).split_even(2).is_err());
    }
}
