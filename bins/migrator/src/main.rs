//! Schema migration runner for the document ledger.
//!
//! Reads `DATABASE_URL` (or `-u <url>`) and applies the ledger schema:
//!   migrator up       - Create suppliers, counters, and document tables
//!   migrator down     - Drop them again
//!   migrator status   - List applied migrations
//!   migrator refresh  - Roll back and re-apply everything
//!
//! The server applies pending migrations on startup as well; this binary is
//! for operating on the schema without starting it.

use docledger_db::migration::Migrator;
use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    cli::run_cli(Migrator).await;
}
