use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use crm_handoff::apis::{ApolloClient, HubSpotClient};
use crm_handoff::config::Config;
use crm_handoff::constants;
use crm_handoff::logging;
use crm_handoff::pipeline::scoring::LeadThresholds;
use crm_handoff::pipeline::{Disposition, LeadSync, LeadSyncReport, MigrationReport, StudentMigration};

#[derive(Parser)]
#[command(name = "crm_handoff")]
#[command(about = "Outreach lead sync and student CSV migration into HubSpot")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML config file (defaults are used if it does not exist)
    #[arg(long, global = true, default_value = constants::DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync replied Apollo leads into HubSpot
    SyncLeads,
    /// Clean a student CSV export into a HubSpot import file
    MigrateStudents {
        /// Input CSV (overrides migration.input_path)
        #[arg(long)]
        input: Option<String>,
        /// Directory for the dated import file (overrides migration.output_dir)
        #[arg(long)]
        output_dir: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(&cli.config).context("loading configuration")?;

    match cli.command {
        Commands::SyncLeads => {
            println!("🚀 Starting Apollo → HubSpot lead sync...");
            let report = sync_leads(&config).await.map_err(|e| {
                error!("Lead sync failed: {:#}", e);
                e
            })?;
            print_sync_report(&report);
        }
        Commands::MigrateStudents { input, output_dir } => {
            println!("🚀 Starting EdTech CRM migration...");
            let mut migration_config = config.migration.clone();
            if let Some(input) = input {
                migration_config.input_path = input;
            }
            if let Some(dir) = output_dir {
                migration_config.output_dir = dir;
            }

            let run_date = chrono::Local::now().date_naive();
            let report = StudentMigration::new(migration_config)
                .run(run_date)
                .map_err(|e| {
                    error!("Migration failed: {}", e);
                    e
                })
                .context("running student migration")?;
            print_migration_report(&report);
        }
    }
    Ok(())
}

async fn sync_leads(config: &Config) -> anyhow::Result<LeadSyncReport> {
    config.lead_sync.require_api_keys()?;
    let source = ApolloClient::new(&config.lead_sync)?;
    let sink = HubSpotClient::new(&config.lead_sync)?;
    let sync = LeadSync::new(
        Box::new(source),
        Box::new(sink),
        LeadThresholds::from(&config.lead_sync),
    );
    let report = sync.run().await?;
    info!(run_id = %report.run_id, "Lead sync finished");
    Ok(report)
}

fn print_sync_report(report: &LeadSyncReport) {
    if report.total == 0 {
        println!("✅ No new replies to sync");
        return;
    }
    for outcome in &report.outcomes {
        match &outcome.disposition {
            Disposition::Synced => {
                println!("   ✅ Synced: {} (Score: {})", outcome.name, outcome.score)
            }
            Disposition::Skipped => {
                println!("   ⏭️  Skipped: {} (Score too low: {})", outcome.name, outcome.score)
            }
            Disposition::Failed(reason) => {
                println!("   ❌ Failed: {} (Score: {}): {}", outcome.name, outcome.score, reason)
            }
        }
    }
    println!("\n✅ Sync complete!");
    println!("   - Total replies: {}", report.total);
    println!("   - Synced to HubSpot: {}", report.synced);
    println!("   - High-quality leads: {}", report.high_quality);
    println!("   - Skipped (low score): {}", report.skipped);
    println!("   - Failed: {}", report.failed);
}

fn print_migration_report(report: &MigrationReport) {
    println!("✅ Migration complete! Import file: {}", report.output_path.display());
    println!("\n📊 Summary:");
    println!("   - Total rows: {}", report.total_rows);
    println!("   - Unique students: {}", report.unique_rows);
    println!("   - Ready for HubSpot: {}", report.valid_rows);
    println!("   - Rejected (invalid email): {}", report.rejected_rows);
    println!("   - Deal stages:");
    for (stage, count) in &report.stage_counts {
        println!("     {stage}: {count}");
    }
}
