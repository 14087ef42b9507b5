// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le trait du fournisseur de données financières et son
// implémentation Yahoo Finance
// ============================================================================

pub mod provider; // Trait MarketDataProvider
pub mod yahoo;    // Client API Yahoo Finance

// Re-export des types principaux
pub use provider::MarketDataProvider;
pub use yahoo::YahooClient;
