//! Upstream chart API client.
//!
//! Fetches the last few daily bars for one futures ticker and normalizes them into a
//! [`Quote`]. The request is bounded by the client timeout and never retried here;
//! callers decide what to do with an [`EnergyError::Upstream`].
//!
//! Price selection (zero is the "no value" sentinel; negative settlements are kept):
//! - latest price: `meta.regularMarketPrice` when present and non-zero, else the last
//!   non-null close of the series.
//! - previous close: `meta.previousClose` when present and non-zero, else the
//!   second-to-last non-null close, else `meta.chartPreviousClose`; failing all three the
//!   latest price itself (zero change).

use std::time::Duration;

use energy_common::{EnergyError, Quote, QuoteSource, Result};
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;

/// Default chart endpoint base.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Something that can produce a live quote for an upstream ticker.
pub trait QuoteFetcher: Send + Sync {
    /// Fetch the latest quote for `ticker`.
    fn fetch(&self, ticker: &str) -> Result<Quote>;
}

/// Blocking client for the Yahoo-style `v8/finance/chart` endpoint.
pub struct ChartClient {
    client: Client,
    base_url: String,
}

impl ChartClient {
    /// Build a client against `base_url` with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json,text/plain,*/*"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, ticker: &str) -> String {
        format!("{}/{}?interval=1d&range=5d", self.base_url, ticker)
    }
}

impl QuoteFetcher for ChartClient {
    fn fetch(&self, ticker: &str) -> Result<Quote> {
        let url = self.chart_url(ticker);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| EnergyError::upstream(ticker, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnergyError::upstream(ticker, format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .map_err(|e| EnergyError::upstream(ticker, e.to_string()))?;
        parse_chart(ticker, &body)
    }
}

/// Parse a chart API response body into a live [`Quote`].
pub fn parse_chart(ticker: &str, body: &str) -> Result<Quote> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| EnergyError::upstream(ticker, format!("invalid JSON: {}", e)))?;

    let chart = envelope
        .chart
        .ok_or_else(|| EnergyError::upstream(ticker, "missing chart"))?;

    if let Some(error) = chart.error {
        let reason = error
            .description
            .or(error.code)
            .unwrap_or_else(|| "unknown upstream error".to_string());
        return Err(EnergyError::upstream(ticker, reason));
    }

    let result = chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| EnergyError::upstream(ticker, "missing chart result"))?;

    let closes: Vec<f64> = result
        .indicators
        .and_then(|indicators| indicators.quote.into_iter().next())
        .and_then(|quote| quote.close)
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .collect();

    let meta = result.meta;

    let price = nonzero(meta.regular_market_price)
        .or_else(|| closes.last().copied())
        .ok_or_else(|| EnergyError::upstream(ticker, "no price in response"))?;

    let previous_close = nonzero(meta.previous_close)
        .or_else(|| closes.len().checked_sub(2).map(|i| closes[i]))
        .or_else(|| nonzero(meta.chart_previous_close))
        .unwrap_or_else(|| {
            debug!("{}: no previous close available, using latest price", ticker);
            price
        });

    Ok(Quote::from_closes(price, previous_close, QuoteSource::Live))
}

fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Option<ChartBody>,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    indicators: Option<ChartIndicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    close: Option<Vec<Option<f64>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpListener, TcpStream};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Instant;

    fn body(meta: &str, closes: &str) -> String {
        format!(
            r#"{{"chart":{{"result":[{{"meta":{meta},"indicators":{{"quote":[{{"close":{closes}}}]}}}}],"error":null}}}}"#
        )
    }

    #[test]
    fn uses_meta_fields_when_present() {
        let json = body(
            r#"{"regularMarketPrice":66.5,"previousClose":67.0}"#,
            "[65.0,66.0,67.0,66.4]",
        );
        let quote = parse_chart("CL=F", &json).unwrap();
        assert_eq!(quote.price, 66.5);
        assert_eq!(quote.previous_close, 67.0);
        assert!((quote.change + 0.5).abs() < 1e-9);
        assert_eq!(quote.source, QuoteSource::Live);
    }

    #[test]
    fn falls_back_to_close_series() {
        let json = body(r#"{"regularMarketPrice":0}"#, "[2.20,null,2.25,2.28,null]");
        let quote = parse_chart("RB=F", &json).unwrap();
        assert_eq!(quote.price, 2.28);
        assert_eq!(quote.previous_close, 2.25);
        let expected = (2.28 - 2.25) / 2.25 * 100.0;
        assert!((quote.change_percent - expected).abs() < 1e-9);
    }

    #[test]
    fn negative_settlement_is_kept() {
        let json = body(
            r#"{"regularMarketPrice":-37.63,"previousClose":18.27}"#,
            "[20.0,18.27,-37.63]",
        );
        let quote = parse_chart("CL=F", &json).unwrap();
        assert_eq!(quote.price, -37.63);
        assert_eq!(quote.previous_close, 18.27);
        assert!(quote.change < 0.0);
    }

    #[test]
    fn chart_previous_close_used_when_series_is_short() {
        let json = body(
            r#"{"regularMarketPrice":70.2,"chartPreviousClose":69.9}"#,
            "[70.2]",
        );
        let quote = parse_chart("BZ=F", &json).unwrap();
        assert_eq!(quote.previous_close, 69.9);
    }

    #[test]
    fn missing_previous_close_gives_zero_change() {
        let json = body(r#"{"regularMarketPrice":2.55}"#, "[]");
        let quote = parse_chart("HO=F", &json).unwrap();
        assert_eq!(quote.previous_close, 2.55);
        assert_eq!(quote.change, 0.0);
        assert_eq!(quote.change_percent, 0.0);
    }

    #[test]
    fn missing_result_is_upstream_error() {
        let err = parse_chart("CL=F", r#"{"chart":{"result":[]}}"#).unwrap_err();
        assert!(matches!(err, EnergyError::Upstream { .. }));

        let err = parse_chart("CL=F", r#"{"finance":{}}"#).unwrap_err();
        assert!(matches!(err, EnergyError::Upstream { .. }));

        let err = parse_chart("CL=F", "<html>").unwrap_err();
        assert!(matches!(err, EnergyError::Upstream { .. }));
    }

    #[test]
    fn upstream_error_object_is_reported() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        match parse_chart("XX=F", json).unwrap_err() {
            EnergyError::Upstream { symbol, reason } => {
                assert_eq!(symbol, "XX=F");
                assert!(reason.contains("delisted"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn no_price_anywhere_is_upstream_error() {
        let json = body("{}", "[null,null]");
        assert!(parse_chart("CL=F", &json).is_err());
    }

    /// Single-connection HTTP stub: hands each accepted stream to `respond`.
    fn serve_once<F>(respond: F) -> SocketAddr
    where
        F: FnOnce(TcpStream) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                respond(stream);
            }
        });
        addr
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        String::from_utf8_lossy(&request).into_owned()
    }

    #[test]
    fn unanswered_request_times_out_as_upstream_error() {
        let addr = serve_once(|mut stream| {
            read_request(&mut stream);
            thread::sleep(Duration::from_secs(3));
        });
        let client =
            ChartClient::new(&format!("http://{}", addr), Duration::from_millis(200)).unwrap();

        let started = Instant::now();
        let err = client.fetch("CL=F").unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(2));
        match err {
            EnergyError::Upstream { symbol, .. } => assert_eq!(symbol, "CL=F"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_success_status_is_upstream_error() {
        let addr = serve_once(|mut stream| {
            read_request(&mut stream);
            let _ = stream.write_all(
                b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        });
        let client =
            ChartClient::new(&format!("http://{}", addr), Duration::from_millis(500)).unwrap();

        match client.fetch("BZ=F").unwrap_err() {
            EnergyError::Upstream { symbol, reason } => {
                assert_eq!(symbol, "BZ=F");
                assert!(reason.contains("503"), "reason was {reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn successful_response_is_parsed_from_chart_path() {
        let (request_tx, request_rx) = mpsc::channel();
        let addr = serve_once(move |mut stream| {
            let _ = request_tx.send(read_request(&mut stream));
            let json = body(r#"{"regularMarketPrice":2.55,"previousClose":2.50}"#, "[2.50]");
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                json.len(),
                json
            );
            let _ = stream.write_all(response.as_bytes());
        });
        let client =
            ChartClient::new(&format!("http://{}/chart/", addr), Duration::from_secs(2)).unwrap();

        let quote = client.fetch("HO=F").unwrap();
        let request = request_rx.recv().unwrap();

        assert!(request.starts_with("GET /chart/HO=F?interval=1d&range=5d "));
        assert_eq!(quote.price, 2.55);
        assert_eq!(quote.source, QuoteSource::Live);
    }

    #[test]
    #[ignore] // Requires network
    fn fetches_live_wti() {
        let client = ChartClient::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT).unwrap();
        let quote = client.fetch("CL=F").unwrap();
        assert!(quote.price > 0.0);
    }
}
