// ============================================================================
// Module : snapshot
// ============================================================================
// Pipeline complet : collecte (builder) puis écriture du JSON (writer)
// ============================================================================

pub mod builder; // Boucle de collecte par symbole
pub mod writer;  // Sérialisation et écriture du fichier

pub use builder::{build_snapshot, into_records, SnapshotBuilder};
pub use writer::{publish_snapshot, render_snapshot, write_snapshot, PublishOutcome};
