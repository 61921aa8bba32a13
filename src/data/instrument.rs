use std::fmt;

/// Symbol of a tradable pair or ticker as typed by the operator, e.g. `BTCUSD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstrumentId(String);

impl InstrumentId {
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(symbol.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Kraken's name for this pair. Legacy assets carry X/Z prefixes.
    pub fn kraken_pair(&self) -> &str {
        match self.0.as_str() {
            "BTCUSD" => "XXBTZUSD",
            "ETHUSD" => "XETHZUSD",
            "XRPUSD" => "XXRPZUSD",
            "LTCUSD" => "XLTCZUSD",
            other => other,
        }
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstrumentId {
    fn from(symbol: &str) -> Self {
        Self::new(symbol)
    }
}
