// ============================================================================
// Structure : SymbolDescriptor
// ============================================================================
// Décrit un symbole de la watchlist (ETF ou action) avec ses champs statiques
//
// CONCEPTS RUST :
// 1. #[derive(...)] : génère automatiquement l'implémentation de traits
//    - Debug : permet d'afficher la structure avec {:?}
//    - Clone : permet de dupliquer la valeur
//    - PartialEq : permet de comparer deux descripteurs avec ==
//
// 2. #[serde(rename = "...")] sur un enum :
//    - Chaque variante est sérialisée avec le libellé attendu par le front-end
// ============================================================================

use serde::{Deserialize, Serialize};

/// Niveau de risque d'un symbole (purement informatif)
///
/// Sérialisé avec les libellés affichés par le front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    #[serde(rename = "저위험")]
    Low,
    #[serde(rename = "중위험")]
    Medium,
    #[serde(rename = "고위험")]
    High,
    #[serde(rename = "초고위험")]
    VeryHigh,
}

impl RiskTier {
    /// Libellé affiché (identique à la forme sérialisée)
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "저위험",
            RiskTier::Medium => "중위험",
            RiskTier::High => "고위험",
            RiskTier::VeryHigh => "초고위험",
        }
    }
}

/// Symbole à récupérer, défini au démarrage et jamais modifié
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDescriptor {
    /// Symbole du ticker (ex: "SCHD", "AAPL")
    pub ticker: String,

    /// Nom affiché (ex: "Schwab US Dividend Equity")
    pub name: String,

    /// Niveau de risque
    pub risk: RiskTier,

    /// Secteur (texte libre, ex: "커버드콜")
    pub sector: String,
}

impl SymbolDescriptor {
    /// Constructeur
    ///
    /// CONCEPT RUST : impl Into<String>
    /// - Accepte &str ou String sans conversion explicite chez l'appelant
    pub fn new(
        ticker: impl Into<String>,
        name: impl Into<String>,
        risk: RiskTier,
        sector: impl Into<String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            risk,
            sector: sector.into(),
        }
    }
}

/// Watchlist par défaut
pub fn default_watchlist() -> Vec<SymbolDescriptor> {
    use RiskTier::*;

    vec![
        SymbolDescriptor::new("SCHD", "Schwab US Dividend Equity", Medium, "배당성장"),
        SymbolDescriptor::new("JEPI", "JPMorgan Equity Premium", Medium, "커버드콜"),
        SymbolDescriptor::new("JEPQ", "JPMorgan Nasdaq Equity", High, "기술주 커버드콜"),
        SymbolDescriptor::new("SPY", "SPDR S&P 500 Trust", Low, "지수추종"),
        SymbolDescriptor::new("QQQ", "Invesco QQQ Trust", Medium, "기술주"),
        SymbolDescriptor::new("TQQQ", "ProShares UltraPro QQQ", VeryHigh, "기술주 3배"),
        SymbolDescriptor::new("O", "Realty Income Corp", Medium, "리츠(부동산)"),
        SymbolDescriptor::new("TLT", "iShares 20+ Year Treasury", Low, "미국 장기채"),
        SymbolDescriptor::new("TSLA", "Tesla Inc", High, "전기차"),
        SymbolDescriptor::new("AAPL", "Apple Inc", Medium, "IT"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_tier_serializes_to_label() {
        let json = serde_json::to_string(&RiskTier::VeryHigh).unwrap();
        assert_eq!(json, "\"초고위험\"");

        let tier: RiskTier = serde_json::from_str("\"저위험\"").unwrap();
        assert_eq!(tier, RiskTier::Low);
        assert_eq!(tier.label(), "저위험");
    }

    #[test]
    fn test_default_watchlist() {
        let watchlist = default_watchlist();
        assert_eq!(watchlist.len(), 10);
        assert_eq!(watchlist[0].ticker, "SCHD");
        assert_eq!(watchlist[5].risk, RiskTier::VeryHigh);

        // Pas de doublons
        let mut tickers: Vec<_> = watchlist.iter().map(|s| s.ticker.as_str()).collect();
        tickers.sort();
        tickers.dedup();
        assert_eq!(tickers.len(), watchlist.len());
    }
}
