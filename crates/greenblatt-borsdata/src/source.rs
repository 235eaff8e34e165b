//! [`KpiSource`] and [`PriceSource`] backed by the Börsdata API.

use crate::BorsdataClient;
use crate::types::{InstrumentStockPrices, KpiHistoryResponse};
use greenblatt_traits::{
    IndicatorId, IndicatorSeries, InstrumentId, KpiSource, PriceAggregation, PriceBar,
    PriceSource, ReportPeriod, Result,
};

impl KpiSource for BorsdataClient {
    async fn fetch_indicator_history(
        &self,
        instrument: InstrumentId,
        indicator: IndicatorId,
        period: ReportPeriod,
        aggregation: PriceAggregation,
    ) -> Result<IndicatorSeries> {
        let response = self
            .kpi_history(instrument, indicator, period, aggregation)
            .await?;
        Ok(to_series(&response))
    }
}

impl PriceSource for BorsdataClient {
    async fn fetch_daily_prices(&self, instruments: &[InstrumentId]) -> Result<Vec<PriceBar>> {
        let prices = self.stock_prices(instruments).await?;
        Ok(to_bars(prices))
    }
}

fn to_series(response: &KpiHistoryResponse) -> IndicatorSeries {
    IndicatorSeries::from_pairs(response.values.iter().map(|v| (v.y, v.v)))
}

/// Flatten price lists into bars sorted by (instrument, date).
///
/// Days without a close are dropped. A missing open becomes NaN, which the
/// return engine treats as no intraday return for that day.
fn to_bars(prices: Vec<InstrumentStockPrices>) -> Vec<PriceBar> {
    let mut bars: Vec<PriceBar> = prices
        .into_iter()
        .flat_map(|list| {
            let instrument = InstrumentId(list.instrument);
            list.stock_prices_list.into_iter().filter_map(move |p| {
                p.c.map(|close| PriceBar {
                    instrument,
                    date: p.d,
                    open: p.o.unwrap_or(f64::NAN),
                    close,
                })
            })
        })
        .collect();
    bars.sort_by_key(|b| (b.instrument, b.date));
    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KpiHistoryValue, StockPrice};
    use greenblatt_traits::Date;

    #[test]
    fn test_to_series_keeps_nulls_as_missing() {
        let response = KpiHistoryResponse {
            kpi_id: Some(2),
            values: vec![
                KpiHistoryValue { y: 2021, p: 5, v: Some(12.5) },
                KpiHistoryValue { y: 2020, p: 5, v: None },
            ],
        };
        let series = to_series(&response);
        assert_eq!(series.len(), 2);
        assert_eq!(series.observations()[0].period, 2021);
        assert!(series.observations()[1].value.is_missing());
    }

    #[test]
    fn test_to_bars_sorts_and_drops_closeless_days() {
        let d = |day| Date::from_ymd_opt(2021, 3, day).unwrap();
        let price = |day, o, c| StockPrice {
            d: d(day),
            o,
            c,
            h: None,
            l: None,
            v: None,
        };
        let prices = vec![
            InstrumentStockPrices {
                instrument: 9,
                stock_prices_list: vec![price(2, Some(1.0), Some(1.1))],
            },
            InstrumentStockPrices {
                instrument: 4,
                stock_prices_list: vec![
                    price(3, None, Some(2.0)),
                    price(2, Some(2.0), None),
                    price(1, Some(2.0), Some(2.1)),
                ],
            },
        ];

        let bars = to_bars(prices);
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].instrument, InstrumentId(4));
        assert_eq!(bars[0].date, d(1));
        assert!(bars[1].open.is_nan());
        assert_eq!(bars[2].instrument, InstrumentId(9));
    }
}
