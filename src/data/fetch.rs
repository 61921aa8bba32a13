use crate::error::DataError;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Closing price of one candle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: DateTime<Utc>,
    pub price: f64,
}

/// Parses the rows of a Kraken OHLC result:
/// `[time, open, high, low, close, vwap, volume, count]`.
pub fn parse_ohlc(rows: &Value) -> Result<Vec<Sample>, DataError> {
    let rows = rows
        .as_array()
        .ok_or_else(|| DataError::malformed("OHLC result is not an array"))?;

    let mut samples = rows
        .iter()
        .map(|row| {
            parse_row(row).ok_or_else(|| DataError::malformed(format!("bad OHLC row: {row}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    samples.sort_by_key(|s| s.time);
    Ok(samples)
}

fn parse_row(row: &Value) -> Option<Sample> {
    let arr = row.as_array()?;
    let time = DateTime::from_timestamp(arr.first()?.as_i64()?, 0)?;
    let price = arr.get(4)?.as_str()?.parse().ok()?;
    Some(Sample { time, price })
}
