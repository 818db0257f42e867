//! Conversion of server payloads into validated domain types.
//!
//! History is mapped point-for-point: no sorting, resampling or
//! aggregation. Dates must already be strictly increasing; a series that is
//! not is rejected with [`DecodeError::UnorderedSeries`] rather than repaired.

use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::domain::{validate_non_negative, validate_optional_finite};
use crate::payload::{RawDate, RawOptionsData, RawSeriesPoint, RawStockPayload, RawSymbol};
use crate::{
    DecodeError, OptionsSummary, SeriesPoint, StockMetrics, StockSnapshot, SymbolEntry, Ticker,
};

/// Normalize raw history into the uniform series shape.
///
/// Empty input yields an empty series.
pub fn normalize(raw: &[RawSeriesPoint]) -> Result<Vec<SeriesPoint>, DecodeError> {
    let mut series: Vec<SeriesPoint> = Vec::with_capacity(raw.len());

    for (index, point) in raw.iter().enumerate() {
        let date = parse_raw_date(&point.date)?;

        if let Some(previous) = series.last() {
            if date <= previous.date {
                return Err(DecodeError::UnorderedSeries {
                    index,
                    previous: previous.date.to_string(),
                    current: date.to_string(),
                });
            }
        }

        series.push(SeriesPoint::new(
            date,
            point.close,
            volume_from_raw(point.volume)?,
            point.cumulative_return.unwrap_or(0.0),
        )?);
    }

    Ok(series)
}

/// Calendar date of a raw timestamp, time-of-day discarded.
///
/// Strings keep the calendar date as written (`2024-01-02`,
/// `2024-01-02T15:30:00`, `2024-01-02 00:00:00+05:00`); epoch milliseconds
/// are read as UTC.
pub fn parse_raw_date(raw: &RawDate) -> Result<Date, DecodeError> {
    match raw {
        RawDate::Text(text) => parse_date_text(text),
        RawDate::EpochMillis(millis) => {
            let nanos = i128::from(*millis) * 1_000_000;
            OffsetDateTime::from_unix_timestamp_nanos(nanos)
                .map(OffsetDateTime::date)
                .map_err(|_| DecodeError::InvalidDate {
                    value: millis.to_string(),
                })
        }
    }
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_iso_date(text: &str) -> Result<Date, DecodeError> {
    Date::parse(text, format_description!("[year]-[month]-[day]")).map_err(|_| {
        DecodeError::InvalidDate {
            value: text.to_owned(),
        }
    })
}

fn parse_date_text(text: &str) -> Result<Date, DecodeError> {
    let trimmed = text.trim();
    let invalid = || DecodeError::InvalidDate {
        value: text.to_owned(),
    };

    let day_part = trimmed.get(..10).ok_or_else(invalid)?;
    match trimmed[10..].chars().next() {
        None | Some('T') | Some(' ') => {}
        Some(_) => return Err(invalid()),
    }

    parse_iso_date(day_part).map_err(|_| invalid())
}

fn volume_from_raw(volume: Option<f64>) -> Result<u64, DecodeError> {
    let Some(volume) = volume else {
        return Ok(0);
    };
    validate_non_negative("volume", volume)?;
    // Saturating float-to-int cast.
    Ok(volume.round() as u64)
}

/// Convert the `GET /symbols` body into catalog entries.
///
/// Rows whose symbol is not a usable ticker are skipped with a warning;
/// the rest of the catalog stays selectable.
pub fn symbols_from_payload(raw: Vec<RawSymbol>) -> Vec<SymbolEntry> {
    raw.into_iter()
        .filter_map(|entry| match Ticker::parse(&entry.symbol) {
            Ok(ticker) => Some(SymbolEntry::new(ticker, entry.security_name.trim())),
            Err(error) => {
                log::warn!("skipping catalog row '{}': {error}", entry.symbol);
                None
            }
        })
        .collect()
}

/// Convert the `GET /stocks/{symbol}/data` body into a snapshot for `ticker`.
pub fn snapshot_from_payload(
    ticker: Ticker,
    raw: RawStockPayload,
) -> Result<StockSnapshot, DecodeError> {
    let series = normalize(raw.hist.as_deref().unwrap_or_default())?;

    let metrics = StockMetrics {
        market_cap: raw.market_cap,
        pe_ratio: raw.pe_ratio,
        beta: raw.beta,
        dividend_yield: raw.dividend_yield,
        fifty_two_week_high: raw.fifty_two_week_high,
        fifty_two_week_low: raw.fifty_two_week_low,
        moving_average_50: raw.ma_50,
        moving_average_200: raw.ma_200,
        rsi: raw.rsi,
        historical_volatility: raw.historical_volatility,
    };
    validate_metrics(&metrics)?;

    let options_summary = raw.options_data.map(options_from_payload).transpose()?;

    Ok(StockSnapshot::new(
        ticker,
        raw.price,
        series,
        metrics,
        options_summary,
    )?)
}

fn validate_metrics(metrics: &StockMetrics) -> Result<(), DecodeError> {
    validate_optional_finite("market_cap", metrics.market_cap)?;
    validate_optional_finite("pe_ratio", metrics.pe_ratio)?;
    validate_optional_finite("beta", metrics.beta)?;
    validate_optional_finite("dividend_yield", metrics.dividend_yield)?;
    validate_optional_finite("fifty_two_week_high", metrics.fifty_two_week_high)?;
    validate_optional_finite("fifty_two_week_low", metrics.fifty_two_week_low)?;
    validate_optional_finite("ma_50", metrics.moving_average_50)?;
    validate_optional_finite("ma_200", metrics.moving_average_200)?;
    validate_optional_finite("rsi", metrics.rsi)?;
    validate_optional_finite("historical_volatility", metrics.historical_volatility)?;
    Ok(())
}

fn options_from_payload(raw: RawOptionsData) -> Result<OptionsSummary, DecodeError> {
    validate_non_negative("put_call_ratio", raw.put_call_ratio)?;

    let expiry_dates = raw
        .expiry_dates
        .iter()
        .map(|value| parse_date_text(value))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(OptionsSummary {
        put_call_ratio: raw.put_call_ratio,
        nearest_expiry: parse_date_text(&raw.nearest_expiry)?,
        expiry_dates,
    })
}

#[cfg(test)]
mod tests {
    use time::Month;

    use super::*;
    use crate::ValidationError;

    fn raw(date: &str, close: f64) -> RawSeriesPoint {
        RawSeriesPoint {
            date: RawDate::Text(date.to_owned()),
            close,
            volume: Some(1_000.0),
            cumulative_return: Some(0.0),
        }
    }

    fn jan(day: u8) -> Date {
        Date::from_calendar_date(2024, Month::January, day).expect("valid date")
    }

    #[test]
    fn empty_history_normalizes_to_empty_series() {
        assert_eq!(normalize(&[]), Ok(Vec::new()));
    }

    #[test]
    fn single_point_is_truncated_to_day() {
        let series = normalize(&[raw("2024-01-02T15:45:00", 148.0)]).expect("valid history");

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, jan(2));
        assert_eq!(series[0].close, 148.0);
        assert_eq!(series[0].volume, 1_000);
    }

    #[test]
    fn keeps_written_calendar_date_for_offset_timestamps() {
        let date = parse_raw_date(&RawDate::Text(String::from("2024-01-02T23:30:00-05:00")))
            .expect("valid date");
        assert_eq!(date, jan(2));
    }

    #[test]
    fn epoch_millis_are_read_as_utc() {
        let date = parse_raw_date(&RawDate::EpochMillis(1_704_153_600_000)).expect("valid date");
        assert_eq!(date, jan(2));
    }

    #[test]
    fn rejects_garbage_dates() {
        for value in ["", "2024-1-2", "2024-01-02X", "02/01/2024", "2024-13-01"] {
            let err = parse_raw_date(&RawDate::Text(value.to_owned())).expect_err(value);
            assert!(matches!(err, DecodeError::InvalidDate { .. }), "{value}");
        }
    }

    #[test]
    fn preserves_input_order() {
        let series = normalize(&[raw("2024-01-02", 1.0), raw("2024-01-03", 2.0)])
            .expect("ordered history");
        let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![1.0, 2.0]);
    }

    #[test]
    fn rejects_out_of_order_history() {
        let err = normalize(&[raw("2024-01-03", 1.0), raw("2024-01-02", 2.0)])
            .expect_err("must fail");
        assert_eq!(
            err,
            DecodeError::UnorderedSeries {
                index: 1,
                previous: String::from("2024-01-03"),
                current: String::from("2024-01-02"),
            }
        );
    }

    #[test]
    fn rejects_duplicate_days() {
        let err = normalize(&[raw("2024-01-02T09:00:00", 1.0), raw("2024-01-02T16:00:00", 2.0)])
            .expect_err("must fail");
        assert!(matches!(err, DecodeError::UnorderedSeries { index: 1, .. }));
    }

    #[test]
    fn missing_volume_and_return_default_to_zero() {
        let point = RawSeriesPoint {
            date: RawDate::Text(String::from("2024-01-02")),
            close: 10.0,
            volume: None,
            cumulative_return: None,
        };
        let series = normalize(&[point]).expect("valid history");
        assert_eq!(series[0].volume, 0);
        assert_eq!(series[0].cumulative_return, 0.0);
    }

    #[test]
    fn negative_close_is_a_decode_error() {
        let err = normalize(&[raw("2024-01-02", -5.0)]).expect_err("must fail");
        assert_eq!(
            err,
            DecodeError::InvalidField(ValidationError::NegativeValue { field: "close" })
        );
    }

    #[test]
    fn builds_snapshot_from_payload() {
        let payload: RawStockPayload = serde_json::from_str(
            r#"{
                "price": 150,
                "hist": [{"Date": "2024-01-02", "Close": 148, "Volume": 1000, "cumulative_return": 0}],
                "market_cap": 2.9e12, "pe_ratio": 29.1, "beta": 1.6, "dividend_yield": 0.5,
                "fifty_two_week_high": 199.6, "fifty_two_week_low": 143.9,
                "ma_50": 180.0, "ma_200": 175.0, "rsi": 75, "historical_volatility": 45,
                "options_data": {
                    "expiry_dates": ["2024-01-19", "2024-02-16"],
                    "put_call_ratio": 0.8,
                    "nearest_expiry": "2024-01-19"
                }
            }"#,
        )
        .expect("valid payload");

        let snapshot = snapshot_from_payload(Ticker::parse("AAPL").expect("valid"), payload)
            .expect("valid snapshot");

        assert_eq!(snapshot.current_price, 150.0);
        assert_eq!(snapshot.series.len(), 1);
        assert_eq!(snapshot.metrics.moving_average_50, Some(180.0));
        assert_eq!(snapshot.metrics.historical_volatility, Some(45.0));

        let options = snapshot.options_summary.expect("options present");
        assert_eq!(options.nearest_expiry, jan(19));
        assert_eq!(options.expiry_dates.len(), 2);
    }

    #[test]
    fn invalid_expiry_date_fails_snapshot() {
        let payload = RawStockPayload {
            price: 1.0,
            hist: None,
            market_cap: None,
            pe_ratio: None,
            beta: None,
            dividend_yield: None,
            fifty_two_week_high: None,
            fifty_two_week_low: None,
            ma_50: None,
            ma_200: None,
            rsi: None,
            historical_volatility: None,
            options_data: Some(RawOptionsData {
                expiry_dates: vec![String::from("soon")],
                put_call_ratio: 1.0,
                nearest_expiry: String::from("2024-01-19"),
            }),
        };

        let err = snapshot_from_payload(Ticker::parse("AAPL").expect("valid"), payload)
            .expect_err("must fail");
        assert!(matches!(err, DecodeError::InvalidDate { .. }));
    }

    #[test]
    fn symbols_payload_skips_unusable_rows() {
        let row = |symbol: &str, name: &str| RawSymbol {
            symbol: symbol.to_owned(),
            security_name: name.to_owned(),
        };

        let symbols = symbols_from_payload(vec![
            row("AAPL", "Apple Inc. "),
            row("", "Blank"),
            row("ABR$D", "Arbor Realty Trust Preferred D"),
            row("BRK/B", "Slash form"),
        ]);

        let tickers: Vec<&str> = symbols.iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAPL", "ABR$D"]);
        assert_eq!(symbols[0].display_name, "Apple Inc.");
    }
}
