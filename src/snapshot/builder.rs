// ============================================================================
// Snapshot Builder : boucle de collecte
// ============================================================================
// Pour chaque symbole, dans l'ordre :
// 1. dernier prix de clôture (0 si historique vide)
// 2. rendement du dividende (0 si absent)
// 3. conversion en devise locale + pourcentage
//
// Un échec sur un symbole ne stoppe pas la boucle : il devient un
// FetchOutcome::Failed, et le symbole est absent du résultat final.
// Pas de nouvel essai.
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::api::MarketDataProvider;
use crate::models::{FetchOutcome, SnapshotRecord, SymbolDescriptor};

/// Collecte séquentielle des données de la watchlist
///
/// CONCEPT RUST : Generics avec trait bound
/// - P peut être le client Yahoo ou un faux fournisseur en test
/// - ?Sized autorise aussi un &dyn MarketDataProvider
pub struct SnapshotBuilder<'a, P: MarketDataProvider + ?Sized> {
    provider: &'a P,
    exchange_rate: f64,
    request_delay: Duration,
}

impl<'a, P: MarketDataProvider + ?Sized> SnapshotBuilder<'a, P> {
    pub fn new(provider: &'a P, exchange_rate: f64) -> Self {
        Self {
            provider,
            exchange_rate,
            request_delay: Duration::ZERO,
        }
    }

    /// Pause entre deux symboles consécutifs (rate limiting)
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Collecte chaque symbole et retourne un résultat explicite par symbole,
    /// dans l'ordre de la liste
    pub async fn fetch_outcomes(&self, symbols: &[SymbolDescriptor]) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::with_capacity(symbols.len());

        for (i, descriptor) in symbols.iter().enumerate() {
            debug!(ticker = %descriptor.ticker, progress = i + 1, total = symbols.len(), "Fetching symbol");
            println!(
                "  [{}/{}] Chargement de {} ({})...",
                i + 1,
                symbols.len(),
                descriptor.ticker,
                descriptor.risk.label()
            );

            let outcome = match self.fetch_record(descriptor).await {
                Ok(record) => {
                    info!(
                        ticker = %record.ticker,
                        price = record.price,
                        dividend_yield = record.r#yield,
                        "Symbol fetched"
                    );
                    println!("    ✓ OK");
                    FetchOutcome::Fetched(record)
                }
                Err(e) => {
                    error!(ticker = %descriptor.ticker, error = ?e, "Failed to fetch symbol, skipping");
                    println!("    ✗ Erreur pour {} : {:#}", descriptor.ticker, e);
                    FetchOutcome::Failed {
                        ticker: descriptor.ticker.clone(),
                        reason: format!("{:#}", e),
                    }
                }
            };
            outcomes.push(outcome);

            // Petit délai entre les requêtes (pas après le dernier symbole)
            if !self.request_delay.is_zero() && i + 1 < symbols.len() {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        let failed = outcomes.iter().filter(|o| !o.is_fetched()).count();
        if failed > 0 {
            warn!(failed, total = symbols.len(), "Some symbols could not be fetched");
        }

        outcomes
    }

    /// Collecte puis ne garde que les symboles récupérés
    pub async fn build(&self, symbols: &[SymbolDescriptor]) -> Vec<SnapshotRecord> {
        into_records(self.fetch_outcomes(symbols).await)
    }

    async fn fetch_record(&self, descriptor: &SymbolDescriptor) -> Result<SnapshotRecord> {
        let close = self.provider.recent_daily_close(&descriptor.ticker).await?;
        let dividend_yield = self.provider.dividend_yield(&descriptor.ticker).await?;

        Ok(SnapshotRecord::from_quote(
            descriptor,
            close,
            dividend_yield,
            self.exchange_rate,
        ))
    }
}

/// Collecte la watchlist sans délai entre les requêtes
pub async fn build_snapshot<P: MarketDataProvider + ?Sized>(
    provider: &P,
    symbols: &[SymbolDescriptor],
    exchange_rate: f64,
) -> Vec<SnapshotRecord> {
    SnapshotBuilder::new(provider, exchange_rate).build(symbols).await
}

/// Filtre les échecs et garde l'ordre des succès
pub fn into_records(outcomes: Vec<FetchOutcome>) -> Vec<SnapshotRecord> {
    outcomes
        .into_iter()
        .filter_map(FetchOutcome::into_record)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
