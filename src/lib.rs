pub mod cleaner;
pub mod dates;
pub mod error;
pub mod mapper;
pub mod report;
pub mod rules;
pub mod session;
pub mod table;

use crate::error::Result;
use crate::report::Report;
use crate::rules::FieldRules;
use crate::session::Session;
use crate::table::Table;
use tracing::info;

/// Session-gated entry point: map, validate and clean one uploaded table.
/// Fatal input problems are caught earlier, at `Table` construction; this
/// pass itself only aggregates recoverable issues into the report.
pub fn run_migration(session: &Session, table: &Table, rules: &FieldRules) -> Result<(Table, Report)> {
    info!("Running migration pass for user '{}'", session.user());

    let (cleaned, report) = cleaner::clean(table, rules);

    info!(
        "Mapped {} of {} columns, {} issues",
        cleaned.headers.len(),
        table.headers.len(),
        report.issues.len()
    );
    Ok((cleaned, report))
}
