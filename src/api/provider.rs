// ============================================================================
// Trait : MarketDataProvider
// ============================================================================
// Les deux opérations logiques dont le snapshot a besoin :
// - dernier prix de clôture sur un jour
// - rendement du dividende (métadonnées générales)
//
// CONCEPT RUST : async_trait
// - Les méthodes async dans un trait passent par la macro #[async_trait]
// - Permet d'injecter un faux fournisseur dans les tests
// ============================================================================

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait MarketDataProvider {
    /// Dernier prix de clôture de l'historique journalier le plus récent.
    ///
    /// `Ok(None)` si l'historique est vide.
    async fn recent_daily_close(&self, symbol: &str) -> Result<Option<f64>>;

    /// Rendement du dividende sous forme de fraction (0.0341 pour 3.41 %).
    ///
    /// `Ok(None)` si le champ est absent ou null.
    async fn dividend_yield(&self, symbol: &str) -> Result<Option<f64>>;
}
