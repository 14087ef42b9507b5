// ============================================================================
// ETF Snapshot - Point d'entrée
// ============================================================================
// Récupère prix et rendement du dividende de la watchlist sur Yahoo Finance,
// convertit les prix en KRW et écrit le JSON lu par le front-end.
//
// Codes de sortie :
//   0 : snapshot écrit (éventuellement partiel)
//   1 : aucune donnée collectée, fichier non écrit
//   erreur (config, écriture) : propagée par main, code non nul
// ============================================================================

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{error, info, warn};

use etf_snapshot::api::YahooClient;
use etf_snapshot::config::Config;
use etf_snapshot::snapshot::{into_records, publish_snapshot, PublishOutcome, SnapshotBuilder};

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! restent pour l'opérateur, les logs détaillés vont dans un
// fichier avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f logs/etf_snapshot.log.*
///
/// # Contrôler le niveau de log
/// RUST_LOG=etf_snapshot=trace etf-snapshot
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "etf_snapshot.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour etf_snapshot, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "etf_snapshot=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(log_dir = %log_dir.display(), "Logging initialisé");
    Ok(())
}

fn main() -> Result<ExitCode> {
    let config = Config::from_env()?;

    // Si l'init échoue, on continue sans fichier de logs
    init_logging(&config.log_dir).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(
        symbols = config.symbols.len(),
        exchange_rate = config.exchange_rate,
        output = %config.output_path.display(),
        "ETF snapshot starting"
    );
    println!("[{}] Début de la collecte des données...", Local::now().format("%H:%M:%S"));

    let client = YahooClient::new()?;

    // CONCEPT RUST : Exécuter du code async dans du code sync
    // - Le client HTTP est async, mais la collecte reste séquentielle :
    //   chaque requête est attendue avant la suivante
    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;
    let builder = SnapshotBuilder::new(&client, config.exchange_rate)
        .with_request_delay(config.request_delay);
    let outcomes = runtime.block_on(builder.fetch_outcomes(&config.symbols));

    let failed: Vec<String> = outcomes
        .iter()
        .filter(|o| !o.is_fetched())
        .map(|o| o.ticker().to_string())
        .collect();
    let records = into_records(outcomes);

    println!("Collecte terminée : {} symboles sur {}", records.len(), config.symbols.len());
    if !failed.is_empty() {
        warn!(?failed, "Snapshot is partial");
        println!("Symboles ignorés : {}", failed.join(", "));
    }

    let today = Local::now().date_naive();
    match publish_snapshot(records, &config.output_path, today)? {
        PublishOutcome::Written { path, count } => {
            info!(path = %path.display(), count, "ETF snapshot finished");
            println!("Fichier JSON enregistré : {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        PublishOutcome::Skipped => {
            error!("No data collected, snapshot not written");
            println!("Aucune donnée collectée. (vérifiez la connexion réseau)");
            Ok(ExitCode::from(1))
        }
    }
}
