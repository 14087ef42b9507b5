// ============================================================================
// API Client : Yahoo Finance
// ============================================================================
// Récupère le dernier prix de clôture et le rendement du dividende
// depuis Yahoo Finance
//
// Deux endpoints :
// - v8/finance/chart : historique journalier (prix de clôture)
// - v10/finance/quoteSummary : métadonnées (summaryDetail.dividendYield)
//   Ce dernier exige un couple cookie + "crumb" obtenu au préalable
//
// CONCEPTS RUST :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. Result<T, E> : gestion d'erreurs avec contexte
// 3. Serde : désérialisation JSON automatique
// 4. Mutex tokio : état mutable (le crumb) derrière une référence &self
// ============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use urlencoding::encode;

use crate::api::MarketDataProvider;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const BASE_URL: &str = "https://query1.finance.yahoo.com";
const COOKIE_URL: &str = "https://fc.yahoo.com";

// ============================================================================
// Structures pour parser la réponse JSON de Yahoo Finance
// ============================================================================
// Yahoo retourne un JSON complexe, on ne déclare que les champs utilisés
//
// CONCEPT RUST : #[serde(rename_all = "camelCase")]
// - "quoteSummary" (JSON) -> "quote_summary" (Rust)
// ============================================================================

/// Réponse de l'endpoint chart
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    /// null quand Yahoo retourne une erreur
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

/// Données de cotation (on ne lit que les clôtures)
#[derive(Debug, Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

/// Réponse de l'endpoint quoteSummary
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<QuoteSummaryResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    summary_detail: Option<SummaryDetail>,
}

/// Yahoo renvoie {"raw": 0.0341, "fmt": "3.41%"} ou {} si pas de dividende
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    dividend_yield: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

/// Cookie + crumb d'authentification Yahoo
#[derive(Debug, Clone)]
struct Crumb {
    cookie: String,
    value: String,
}

// ============================================================================
// Client
// ============================================================================

/// Client Yahoo Finance
///
/// Le crumb est récupéré à la première requête quoteSummary et conservé
/// dans l'instance (pas de cache global).
pub struct YahooClient {
    http: reqwest::Client,
    crumb: Mutex<Option<Crumb>>,
}

impl YahooClient {
    /// Crée le client HTTP avec un User-Agent de navigateur
    /// (Yahoo bloque les clients sans User-Agent)
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            http,
            crumb: Mutex::new(None),
        })
    }

    /// Récupère l'historique d'un jour et retourne la dernière clôture
    #[instrument(skip(self))]
    async fn fetch_last_close(&self, symbol: &str) -> Result<Option<f64>> {
        let url = build_chart_url(symbol);
        debug!(url = %url, "Sending chart request to Yahoo Finance");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("Échec de la requête HTTP vers Yahoo Finance (chart)")?;

        let status = response.status();
        debug!(status = %status, "Received chart response");

        if !status.is_success() {
            error!(status = %status, "Yahoo Finance returned error status");
            anyhow::bail!("Yahoo Finance a retourné une erreur : HTTP {}", status);
        }

        let chart: ChartResponse = response
            .json()
            .await
            .context("Échec du parsing JSON de la réponse chart")?;

        let close = parse_last_close(chart, symbol)?;
        match close {
            Some(price) => info!(close = price, "Fetched last close"),
            None => warn!("Empty price history"),
        }
        Ok(close)
    }

    /// Récupère summaryDetail et retourne dividendYield.raw
    #[instrument(skip(self))]
    async fn fetch_dividend_yield(&self, symbol: &str) -> Result<Option<f64>> {
        let crumb = self.ensure_crumb().await?;
        let url = build_quote_summary_url(symbol, &crumb.value);
        debug!(url = %url, "Sending quoteSummary request to Yahoo Finance");

        let response = self
            .http
            .get(&url)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .context("Échec de la requête HTTP vers Yahoo Finance (quoteSummary)")?;

        let status = response.status();
        debug!(status = %status, "Received quoteSummary response");

        // Crumb expiré : on l'oublie pour le prochain symbole, pas de nouvel essai
        if status == StatusCode::UNAUTHORIZED {
            warn!("Yahoo authentication expired, clearing crumb");
            self.crumb.lock().await.take();
            anyhow::bail!("Authentification Yahoo expirée (HTTP 401)");
        }

        if !status.is_success() {
            error!(status = %status, "Yahoo Finance returned error status");
            anyhow::bail!("Yahoo Finance a retourné une erreur : HTTP {}", status);
        }

        let summary: QuoteSummaryResponse = response
            .json()
            .await
            .context("Échec du parsing JSON de la réponse quoteSummary")?;

        let dividend_yield = parse_dividend_yield(summary, symbol)?;
        debug!(?dividend_yield, "Parsed dividend yield");
        Ok(dividend_yield)
    }

    /// Retourne le crumb en cache ou en récupère un nouveau
    ///
    /// CONCEPT RUST : MutexGuard tenu à travers un .await
    /// - Possible avec tokio::sync::Mutex (pas avec std::sync::Mutex)
    async fn ensure_crumb(&self) -> Result<Crumb> {
        let mut guard = self.crumb.lock().await;
        if let Some(crumb) = guard.as_ref() {
            return Ok(crumb.clone());
        }

        let crumb = self.fetch_crumb().await?;
        *guard = Some(crumb.clone());
        Ok(crumb)
    }

    /// Étape 1 : cookie depuis fc.yahoo.com
    /// Étape 2 : crumb depuis /v1/test/getcrumb avec ce cookie
    async fn fetch_crumb(&self) -> Result<Crumb> {
        debug!("Fetching Yahoo cookie");
        let response = self
            .http
            .get(COOKIE_URL)
            .send()
            .await
            .context("Échec de la récupération du cookie Yahoo")?;

        // fc.yahoo.com répond souvent 404 mais pose quand même le cookie
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .context("Cookie Yahoo absent de la réponse")?;

        debug!("Fetching Yahoo crumb");
        let response = self
            .http
            .get(format!("{}/v1/test/getcrumb", BASE_URL))
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .context("Échec de la requête du crumb Yahoo")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Échec de la lecture du crumb Yahoo")?;

        let value = parse_crumb(status, &body)?;
        info!("Yahoo crumb acquired");
        Ok(Crumb { cookie, value })
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn recent_daily_close(&self, symbol: &str) -> Result<Option<f64>> {
        self.fetch_last_close(symbol).await
    }

    async fn dividend_yield(&self, symbol: &str) -> Result<Option<f64>> {
        self.fetch_dividend_yield(symbol).await
    }
}

// ============================================================================
// Construction des URLs et parsing
// ============================================================================

/// URL de l'historique journalier sur 1 jour
fn build_chart_url(symbol: &str) -> String {
    format!(
        "{}/v8/finance/chart/{}?range=1d&interval=1d",
        BASE_URL,
        encode(symbol)
    )
}

/// URL quoteSummary limitée au module summaryDetail
fn build_quote_summary_url(symbol: &str, crumb: &str) -> String {
    format!(
        "{}/v10/finance/quoteSummary/{}?modules=summaryDetail&crumb={}",
        BASE_URL,
        encode(symbol),
        encode(crumb)
    )
}

/// Valide la réponse de getcrumb
///
/// Un corps d'erreur ("Too Many Requests") ne doit jamais être mis en cache
/// comme crumb.
fn parse_crumb(status: StatusCode, body: &str) -> Result<String> {
    if !status.is_success() {
        error!(status = %status, "Yahoo Finance refused crumb request");
        anyhow::bail!("Yahoo Finance a retourné une erreur pour le crumb : HTTP {}", status);
    }

    let value = body.trim();
    if value.is_empty() {
        anyhow::bail!("Crumb Yahoo vide");
    }
    Ok(value.to_string())
}

/// Extrait la dernière clôture non nulle
///
/// - erreur Yahoo ou résultat absent -> Err
/// - aucune clôture -> Ok(None)
fn parse_last_close(response: ChartResponse, symbol: &str) -> Result<Option<f64>> {
    if let Some(err) = response.chart.error.filter(|e| !e.is_null()) {
        anyhow::bail!("Yahoo Finance a retourné une erreur pour {} : {}", symbol, err);
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .with_context(|| format!("Aucune donnée retournée par Yahoo Finance pour {}", symbol))?;

    // CONCEPT RUST : Iterators
    // - .flatten() retire les Option<None> (clôtures manquantes)
    // - .last() garde la plus récente
    let close = result
        .indicators
        .and_then(|indicators| indicators.quote.into_iter().next())
        .and_then(|quote| quote.close)
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .last();

    Ok(close)
}

/// Extrait summaryDetail.dividendYield.raw
fn parse_dividend_yield(response: QuoteSummaryResponse, symbol: &str) -> Result<Option<f64>> {
    if let Some(err) = response.quote_summary.error.filter(|e| !e.is_null()) {
        anyhow::bail!("Yahoo Finance a retourné une erreur pour {} : {}", symbol, err);
    }

    let result = response
        .quote_summary
        .result
        .and_then(|results| results.into_iter().next())
        .with_context(|| format!("Aucune métadonnée retournée par Yahoo Finance pour {}", symbol))?;

    Ok(result
        .summary_detail
        .and_then(|detail| detail.dividend_yield)
        .and_then(|value| value.raw))
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(json: &str) -> ChartResponse {
        serde_json::from_str(json).unwrap()
    }

    fn summary(json: &str) -> QuoteSummaryResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_build_urls() {
        let url = build_chart_url("SCHD");
        assert!(url.contains("/v8/finance/chart/SCHD"));
        assert!(url.contains("range=1d"));
        assert!(url.contains("interval=1d"));

        let url = build_quote_summary_url("BRK B", "ab/c");
        assert!(url.contains("quoteSummary/BRK%20B"));
        assert!(url.contains("modules=summaryDetail"));
        assert!(url.contains("crumb=ab%2Fc"));
    }

    #[test]
    fn test_parse_crumb() {
        assert_eq!(parse_crumb(StatusCode::OK, " abc.DEF\n").unwrap(), "abc.DEF");
        assert!(parse_crumb(StatusCode::OK, "  ").is_err());
    }

    #[test]
    fn test_parse_crumb_rejects_error_status() {
        assert!(parse_crumb(StatusCode::TOO_MANY_REQUESTS, "Too Many Requests").is_err());
        assert!(parse_crumb(StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable").is_err());
    }

    #[test]
    fn test_parse_last_close_takes_latest_value() {
        let response = chart(
            r#"{"chart":{"result":[{"meta":{"symbol":"SCHD"},"timestamp":[1,2,3],
                "indicators":{"quote":[{"close":[27.1,null,27.5]}]}}],"error":null}}"#,
        );
        assert_eq!(parse_last_close(response, "SCHD").unwrap(), Some(27.5));
    }

    #[test]
    fn test_parse_last_close_skips_trailing_null() {
        let response = chart(
            r#"{"chart":{"result":[{"indicators":{"quote":[{"close":[27.1,null]}]}}],"error":null}}"#,
        );
        assert_eq!(parse_last_close(response, "SCHD").unwrap(), Some(27.1));
    }

    #[test]
    fn test_parse_last_close_empty_history() {
        let response = chart(
            r#"{"chart":{"result":[{"meta":{"symbol":"SCHD"},"indicators":{"quote":[{}]}}],"error":null}}"#,
        );
        assert_eq!(parse_last_close(response, "SCHD").unwrap(), None);
    }

    #[test]
    fn test_parse_last_close_error() {
        let response = chart(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#,
        );
        assert!(parse_last_close(response, "XXXX").is_err());
    }

    #[test]
    fn test_parse_dividend_yield() {
        let response = summary(
            r#"{"quoteSummary":{"result":[{"summaryDetail":{
                "dividendYield":{"raw":0.0341,"fmt":"3.41%"}}}],"error":null}}"#,
        );
        assert_eq!(parse_dividend_yield(response, "SCHD").unwrap(), Some(0.0341));
    }

    #[test]
    fn test_parse_dividend_yield_missing() {
        // Pas de dividende : objet vide
        let response = summary(
            r#"{"quoteSummary":{"result":[{"summaryDetail":{"dividendYield":{}}}],"error":null}}"#,
        );
        assert_eq!(parse_dividend_yield(response, "TSLA").unwrap(), None);

        // Champ absent
        let response = summary(r#"{"quoteSummary":{"result":[{"summaryDetail":{}}],"error":null}}"#);
        assert_eq!(parse_dividend_yield(response, "TSLA").unwrap(), None);

        // Null
        let response = summary(
            r#"{"quoteSummary":{"result":[{"summaryDetail":{"dividendYield":null}}],"error":null}}"#,
        );
        assert_eq!(parse_dividend_yield(response, "TSLA").unwrap(), None);
    }

    #[test]
    fn test_parse_dividend_yield_error() {
        let response = summary(
            r#"{"quoteSummary":{"result":null,"error":{"code":"Not Found","description":"Quote not found"}}}"#,
        );
        assert!(parse_dividend_yield(response, "XXXX").is_err());
    }

    // Appel réel : nécessite une connexion réseau
    // Lancer avec : cargo test -- --ignored
    #[tokio::test]
    #[ignore = "requires network access to Yahoo Finance"]
    async fn test_fetch_from_yahoo() {
        let client = YahooClient::new().unwrap();

        match client.recent_daily_close("SPY").await {
            Ok(close) => {
                assert!(close.unwrap_or(0.0) >= 0.0);
                println!("✓ SPY close : {:?}", close);
            }
            Err(e) => println!("⚠ Test skippé (pas de connexion?) : {}", e),
        }

        match client.dividend_yield("SPY").await {
            Ok(dividend_yield) => println!("✓ SPY dividend yield : {:?}", dividend_yield),
            Err(e) => println!("⚠ Test skippé (pas de connexion?) : {}", e),
        }
    }
}
