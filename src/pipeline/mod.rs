// Pure transformation stages and the two batch orchestrators built from them

pub mod dedupe;
pub mod lead_sync;
pub mod mapper;
pub mod migration;
pub mod normalize;
pub mod scoring;

pub use lead_sync::{Disposition, LeadOutcome, LeadSync, LeadSyncReport};
pub use migration::{MigrationBatch, MigrationReport, StudentMigration};
