//! Outer join of indicator series by period.

use greenblatt_traits::{IndicatorSeries, InstrumentId, KpiRow, KpiValue, Year};
use std::collections::BTreeMap;

/// Merge named indicator series of one instrument into one row per period.
///
/// The result covers the union of all periods. Each row has a column for
/// every given indicator; cells without an observation are
/// [`KpiValue::Missing`]. A period repeated within one series keeps its last
/// observation. Rows come back ordered by year.
#[must_use]
pub fn outer_join(instrument: InstrumentId, series: &[(&str, IndicatorSeries)]) -> Vec<KpiRow> {
    let mut cells: BTreeMap<Year, BTreeMap<&str, KpiValue>> = BTreeMap::new();
    for (name, s) in series {
        for obs in s.observations() {
            cells.entry(obs.period).or_default().insert(*name, obs.value);
        }
    }

    cells
        .into_iter()
        .map(|(year, observed)| {
            let mut row = KpiRow::new(year, instrument);
            for (name, _) in series {
                row.set(*name, observed.get(name).copied().unwrap_or_default());
            }
            row
        })
        .collect()
}
