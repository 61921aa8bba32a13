use crate::{config::AppConfig, error::DataError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

const YAHOO_SEARCH: &str = "https://query2.finance.yahoo.com/v1/finance/search";
const YAHOO_CHART: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const YAHOO_QUOTE: &str = "https://query1.finance.yahoo.com/v7/finance/quote";

// Yahoo rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Equity lookups for the stocks menu.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Best matching ticker for a company name or symbol, if any.
    async fn search(&self, query: &str) -> Result<Option<String>, DataError>;

    async fn quote(&self, ticker: &str) -> Result<Quote, DataError>;
}

/// Valuation figures only the quote endpoint reports.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fundamentals {
    pub market_cap: Option<u64>,
    pub shares_outstanding: Option<u64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    /// Percent, e.g. `0.44` for 0.44 %.
    pub dividend_yield: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub currency: Option<String>,
    pub regular_market_price: Option<f64>,
    pub chart_previous_close: Option<f64>,
    pub regular_market_day_high: Option<f64>,
    pub regular_market_day_low: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub regular_market_volume: Option<u64>,
    #[serde(flatten)]
    pub fundamentals: Fundamentals,
}

impl Quote {
    pub fn name(&self) -> &str {
        self.long_name
            .as_deref()
            .or(self.short_name.as_deref())
            .unwrap_or("Not found")
    }

    /// Change against the previous close, in percent.
    pub fn change_pct(&self) -> Option<f64> {
        let price = self.regular_market_price?;
        let previous = self.chart_previous_close.filter(|p| *p > 0.0)?;
        Some((price - previous) / previous * 100.0)
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let currency = self.currency.as_deref().unwrap_or("USD");
        let money = |value: Option<f64>| match value {
            Some(v) => format!("{v:.2} {currency}"),
            None => "N/A".to_string(),
        };
        let count = |value: Option<u64>| {
            value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
        };
        let f = &self.fundamentals;

        vec![
            format!("Company Name: {} ({})", self.name(), self.symbol),
            format!("Stock Price: {}", money(self.regular_market_price)),
            match self.change_pct() {
                Some(pct) => format!("Change: {pct:+.2}%"),
                None => "Change: N/A".to_string(),
            },
            format!("Market Cap: {}", count(f.market_cap)),
            format!("Shares Outstanding: {}", count(f.shares_outstanding)),
            match f.trailing_pe {
                Some(pe) => format!("P/E Ratio: {pe:.2}"),
                None => "P/E Ratio: N/A".to_string(),
            },
            match f.dividend_yield {
                Some(pct) => format!("Dividend Yield: {pct:.2}%"),
                None => "Dividend Yield: N/A".to_string(),
            },
            format!(
                "Day Range: {} - {}",
                money(self.regular_market_day_low),
                money(self.regular_market_day_high)
            ),
            format!("52 Week High: {}", money(self.fifty_two_week_high)),
            format!("52 Week Low: {}", money(self.fifty_two_week_low)),
            match self.regular_market_volume {
                Some(v) => format!("Volume: {v}"),
                None => "Volume: N/A".to_string(),
            },
        ]
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    quotes: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Quote,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    quote_response: QuoteBody,
}

#[derive(Debug, Deserialize)]
struct QuoteBody {
    #[serde(default)]
    result: Vec<Fundamentals>,
}

#[derive(Debug, Clone)]
pub struct YahooClient {
    http: Client,
}

impl YahooClient {
    pub fn new(config: &AppConfig) -> Result<Self, DataError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http })
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, DataError> {
        debug!(%url, ?query, "yahoo request");
        Ok(self
            .http
            .get(url)
            .query(query)
            .send()
            .await?
            .json::<Value>()
            .await?)
    }
}

#[async_trait]
impl QuoteSource for YahooClient {
    async fn search(&self, query: &str) -> Result<Option<String>, DataError> {
        let body = self.get_json(YAHOO_SEARCH, &[("q", query)]).await?;
        parse_search(body)
    }

    async fn quote(&self, ticker: &str) -> Result<Quote, DataError> {
        let url = format!("{YAHOO_CHART}/{ticker}");
        let body = self
            .get_json(&url, &[("range", "1d"), ("interval", "1d")])
            .await?;
        let mut quote = parse_quote(body)?;

        // Optional: the summary prints N/A for whatever this cannot supply.
        match self.get_json(YAHOO_QUOTE, &[("symbols", ticker)]).await {
            Ok(body) => match parse_fundamentals(body) {
                Ok(fundamentals) => quote.fundamentals = fundamentals,
                Err(error) => warn!(%error, ticker, "unexpected fundamentals payload"),
            },
            Err(error) => warn!(%error, ticker, "fundamentals lookup failed"),
        }
        Ok(quote)
    }
}

fn parse_search(body: Value) -> Result<Option<String>, DataError> {
    let response: SearchResponse =
        serde_json::from_value(body).map_err(|e| DataError::malformed(e.to_string()))?;
    Ok(response.quotes.into_iter().next().map(|hit| hit.symbol))
}

fn parse_quote(body: Value) -> Result<Quote, DataError> {
    let response: ChartResponse =
        serde_json::from_value(body).map_err(|e| DataError::malformed(e.to_string()))?;

    if let Some(error) = response.chart.error.filter(|e| !e.is_null()) {
        return Err(DataError::malformed(format!("yahoo: {error}")));
    }

    response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .map(|result| result.meta)
        .ok_or_else(|| DataError::malformed("chart has no result"))
}

fn parse_fundamentals(body: Value) -> Result<Fundamentals, DataError> {
    let response: QuoteResponse =
        serde_json::from_value(body).map_err(|e| DataError::malformed(e.to_string()))?;
    Ok(response
        .quote_response
        .result
        .into_iter()
        .next()
        .unwrap_or_default())
}
