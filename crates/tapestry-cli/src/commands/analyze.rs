//! Analyze command implementation.

use super::item_ids;
use crate::cli::AnalyzeArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::Session;

/// Execute the analyze command.
pub async fn execute_analyze(args: AnalyzeArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    let ids = item_ids(&args.ids);
    let report = session
        .orchestrator
        .batch_analyze(&ids, args.item_type.into())
        .await;

    println!("{}", formatter.format_analyses(&report)?);

    match report.failure_count() {
        0 => Ok(()),
        failed => Err(CliError::PartialFailure {
            failed,
            total: ids.len(),
        }),
    }
}
