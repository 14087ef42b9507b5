// ============================================================================
// Structures : SnapshotRecord, SnapshotDocument, FetchOutcome
// ============================================================================
// Représente le résultat de la collecte :
// - SnapshotRecord : une ligne du JSON (un symbole récupéré avec succès)
// - SnapshotDocument : le fichier complet { updated_at, etfs }
// - FetchOutcome : résultat explicite par symbole (succès ou échec + raison)
//
// CONCEPT RUST : Enum avec données
// - Chaque variante peut porter ses propres champs
// - Remplace le "try/continue" implicite par une valeur qu'on peut filtrer
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{RiskTier, SymbolDescriptor};

/// Format de la date `updated_at`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Convertit un prix en devise source vers la devise locale
///
/// Le résultat est tronqué (pas arrondi) : 100.9 * 1 -> 100.
/// Les prix sont supposés positifs, la troncature se fait donc vers zéro.
pub fn localize_price(price: f64, exchange_rate: f64) -> i64 {
    // CONCEPT RUST : `as` depuis un f64
    // - Tronque vers zéro, sature aux bornes, NaN -> 0
    (price * exchange_rate).trunc() as i64
}

/// Convertit un rendement fractionnaire (0.0341) en pourcentage à 2 décimales (3.41)
///
/// Arrondi correct de la valeur binaire exacte (égalité -> chiffre pair),
/// donc 0.125 -> 0.12 et 2.675 -> 2.67.
pub fn yield_percent(fraction: f64) -> f64 {
    let percent = fraction * 100.0;
    // CONCEPT RUST : {:.2} arrondit la valeur binaire exacte, sans
    // multiplication supplémentaire qui ajouterait une erreur d'arrondi
    format!("{:.2}", percent).parse().unwrap_or(percent)
}

/// Un symbole récupéré avec succès, tel qu'écrit dans le JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub ticker: String,
    pub name: String,

    /// Prix en devise locale (entier tronqué)
    pub price: i64,

    /// Rendement du dividende en pourcentage, arrondi à 2 décimales
    /// CONCEPT RUST : r#yield
    /// - `yield` est un mot réservé, le préfixe r# permet de l'utiliser comme nom
    pub r#yield: f64,

    pub risk: RiskTier,
    pub sector: String,
}

impl SnapshotRecord {
    /// Construit un enregistrement depuis le descripteur et les données brutes du fournisseur
    ///
    /// * `close` - dernier prix de clôture (None si l'historique est vide)
    /// * `dividend_yield` - rendement fractionnaire (None si absent)
    pub fn from_quote(
        descriptor: &SymbolDescriptor,
        close: Option<f64>,
        dividend_yield: Option<f64>,
        exchange_rate: f64,
    ) -> Self {
        Self {
            ticker: descriptor.ticker.clone(),
            name: descriptor.name.clone(),
            price: localize_price(close.unwrap_or(0.0), exchange_rate),
            r#yield: yield_percent(dividend_yield.unwrap_or(0.0)),
            risk: descriptor.risk,
            sector: descriptor.sector.clone(),
        }
    }
}

/// Le document JSON complet consommé par le front-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    /// Date de génération au format YYYY-MM-DD
    pub updated_at: String,
    pub etfs: Vec<SnapshotRecord>,
}

impl SnapshotDocument {
    pub fn new(date: NaiveDate, etfs: Vec<SnapshotRecord>) -> Self {
        Self {
            updated_at: date.format(DATE_FORMAT).to_string(),
            etfs,
        }
    }
}

/// Résultat de la collecte pour un symbole
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Données récupérées
    Fetched(SnapshotRecord),

    /// Échec : le symbole est ignoré
    Failed { ticker: String, reason: String },
}

impl FetchOutcome {
    pub fn ticker(&self) -> &str {
        match self {
            FetchOutcome::Fetched(record) => &record.ticker,
            FetchOutcome::Failed { ticker, .. } => ticker,
        }
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self, FetchOutcome::Fetched(_))
    }

    /// Consomme le résultat et retourne l'enregistrement s'il existe
    pub fn into_record(self) -> Option<SnapshotRecord> {
        match self {
            FetchOutcome::Fetched(record) => Some(record),
            FetchOutcome::Failed { .. } => None,
        }
    }
}
