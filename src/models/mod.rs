// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données du snapshot
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod symbol;   // Déclaration du module symbol (fichier symbol.rs)
pub mod snapshot; // Déclaration du module snapshot (fichier snapshot.rs)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use etf_snapshot::models::symbol::SymbolDescriptor;
// On peut faire : use etf_snapshot::models::SymbolDescriptor;
pub use symbol::{default_watchlist, RiskTier, SymbolDescriptor};
pub use snapshot::{
    localize_price, yield_percent, FetchOutcome, SnapshotDocument, SnapshotRecord, DATE_FORMAT,
};
