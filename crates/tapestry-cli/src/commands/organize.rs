//! Organize command implementation.

use super::item_ids;
use crate::cli::OrganizeArgs;
use crate::error::{CliError, Result};
use crate::output::{Formatter, OutputFormat};
use crate::session::Session;

/// Execute the organize command.
///
/// Items that fail analysis are reported and left out of organization.
pub async fn execute_organize(args: OrganizeArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    let ids = item_ids(&args.ids);
    let analyses = session
        .orchestrator
        .batch_analyze(&ids, args.item_type.into())
        .await;
    let outcomes = session
        .orchestrator
        .batch_apply_organization(analyses.succeeded().cloned().collect())
        .await;

    if formatter.format() == OutputFormat::Table {
        for (item_id, error) in analyses.failed() {
            println!("{}", formatter.error(&format!("{}: {}", item_id, error)));
        }
    }
    println!("{}", formatter.format_outcomes(&outcomes)?);

    let failed = analyses.failure_count() + outcomes.failure_count();
    if failed > 0 {
        return Err(CliError::PartialFailure {
            failed,
            total: ids.len(),
        });
    }

    if formatter.format() == OutputFormat::Table {
        println!("{}", formatter.success(&format!("Organized {} item(s)", ids.len())));
        println!("{}", formatter.info(&session.orchestrator.metrics().summary()));
    }
    Ok(())
}
