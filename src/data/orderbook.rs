use crate::error::DataError;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct DepthLevel {
    pub price: f64,
    pub volume: f64,
}

/// Point-in-time order book: bids best (highest) first, asks best (lowest) first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepthSnapshot {
    pub bids: Vec<DepthLevel>,
    pub asks: Vec<DepthLevel>,
}

impl DepthSnapshot {
    pub fn spread(&self) -> Option<f64> {
        Some(self.asks.first()?.price - self.bids.first()?.price)
    }
}

/// Parses a Kraken depth entry: `{"asks": [[price, volume, ts], ..], "bids": [..]}`.
pub fn parse_depth(book: &Value) -> Result<DepthSnapshot, DataError> {
    let mut bids = parse_side(book, "bids")?;
    let mut asks = parse_side(book, "asks")?;

    bids.sort_by(|a, b| b.price.total_cmp(&a.price));
    asks.sort_by(|a, b| a.price.total_cmp(&b.price));

    Ok(DepthSnapshot { bids, asks })
}

fn parse_side(book: &Value, side: &str) -> Result<Vec<DepthLevel>, DataError> {
    book.get(side)
        .and_then(|v| v.as_array())
        .ok_or_else(|| DataError::malformed(format!("depth has no {side}")))?
        .iter()
        .map(|entry| {
            parse_level(entry)
                .ok_or_else(|| DataError::malformed(format!("bad {side} level: {entry}")))
        })
        .collect()
}

fn parse_level(entry: &Value) -> Option<DepthLevel> {
    let arr = entry.as_array()?;
    Some(DepthLevel {
        price: arr.first()?.as_str()?.parse().ok()?,
        volume: arr.get(1)?.as_str()?.parse().ok()?,
    })
}
