// ============================================================================
// ETF Snapshot - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;      // Fournisseur de données (Yahoo Finance)
pub mod config;   // Configuration (variables d'environnement)
pub mod models;   // Structures de données
pub mod snapshot; // Collecte et écriture du JSON
