//! Derived ratio fields.
//!
//! Price multiples are turned into yields so that every ranked indicator can
//! share a "higher is better" reading. The canonical case is earnings yield,
//! the reciprocal of P/E.

use greenblatt_traits::{KpiRow, KpiValue};
use serde::{Deserialize, Serialize};

/// Column name for the price-to-earnings indicator.
pub const PRICE_TO_EARNINGS: &str = "PE";

/// Column name for the derived earnings yield.
pub const EARNINGS_YIELD: &str = "Earnings Yield";

/// Reciprocal of `value`; zero and missing inputs give [`KpiValue::Missing`].
#[must_use]
pub fn reciprocal(value: KpiValue) -> KpiValue {
    match value {
        KpiValue::Value(v) if v != 0.0 => KpiValue::new(1.0 / v),
        _ => KpiValue::Missing,
    }
}

/// Earnings yield from a P/E value.
#[must_use]
pub fn earnings_yield(pe: KpiValue) -> KpiValue {
    reciprocal(pe)
}

/// A field computed as the reciprocal of another field in the same row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReciprocalField {
    /// Source column (e.g. `"PE"`).
    pub source: String,
    /// Target column (e.g. `"Earnings Yield"`).
    pub target: String,
}

impl ReciprocalField {
    /// Create a reciprocal field definition.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Earnings yield from P/E.
    #[must_use]
    pub fn earnings_yield() -> Self {
        Self::new(PRICE_TO_EARNINGS, EARNINGS_YIELD)
    }

    /// Add the target column to every row when the source column exists for
    /// the instrument. Returns whether the field was applied.
    pub fn apply(&self, rows: &mut [KpiRow]) -> bool {
        if !rows.iter().any(|r| r.has(&self.source)) {
            return false;
        }
        for row in rows.iter_mut() {
            let value = reciprocal(row.get(&self.source));
            row.set(self.target.clone(), value);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use greenblatt_traits::InstrumentId;

    #[test]
    fn test_earnings_yield() {
        assert_relative_eq!(earnings_yield(KpiValue::Value(10.0)).value().unwrap(), 0.1);
        assert_relative_eq!(earnings_yield(KpiValue::Value(-4.0)).value().unwrap(), -0.25);
        assert!(earnings_yield(KpiValue::Value(0.0)).is_missing());
        assert!(earnings_yield(KpiValue::Missing).is_missing());
    }

    #[test]
    fn test_apply_fills_every_row() {
        let mut with_pe = KpiRow::new(2020, InstrumentId(1));
        with_pe.set(PRICE_TO_EARNINGS, KpiValue::Value(5.0));
        let mut without_pe = KpiRow::new(2021, InstrumentId(1));
        without_pe.set("ROC", KpiValue::Value(0.2));
        let mut rows = vec![with_pe, without_pe];

        assert!(ReciprocalField::earnings_yield().apply(&mut rows));
        assert_relative_eq!(rows[0].get(EARNINGS_YIELD).value().unwrap(), 0.2);
        assert!(rows[1].has(EARNINGS_YIELD));
        assert!(rows[1].get(EARNINGS_YIELD).is_missing());
    }

    #[test]
    fn test_apply_without_source_column() {
        let mut row = KpiRow::new(2020, InstrumentId(1));
        row.set("ROC", KpiValue::Value(0.2));
        let mut rows = vec![row];

        assert!(!ReciprocalField::earnings_yield().apply(&mut rows));
        assert!(!rows[0].has(EARNINGS_YIELD));
    }
}
