//! Pathways command implementation.

use crate::cli::PathwaysArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::session::Session;
use tapestry_domain::ItemId;

/// Execute the pathways command.
pub async fn execute_pathways(args: PathwaysArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    let item_id = ItemId::new(args.id.as_str());

    let pathways = if args.recommended {
        session.orchestrator.get_recommended_pathways(&item_id).await?
    } else {
        session.orchestrator.generate_educational_pathways(&item_id).await?
    };

    println!("{}", formatter.format_pathways(&pathways)?);
    Ok(())
}
