//! Network command implementation.

use crate::cli::{NetworkArgs, NetworkView};
use crate::error::Result;
use crate::output::Formatter;
use crate::session::Session;
use tapestry_domain::ItemId;

/// Execute the network command.
pub async fn execute_network(args: NetworkArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    let item_id = ItemId::new(args.id.as_str());
    let orchestrator = &session.orchestrator;

    let output = match args.view {
        NetworkView::Full => {
            let network = orchestrator
                .analyze_relationship_network(&item_id, args.depth)
                .await?;
            formatter.format_network(&network)?
        }
        NetworkView::Clusters => {
            let clusters = orchestrator.get_cultural_clusters(&item_id, args.depth).await?;
            formatter.format_clusters(&clusters)?
        }
        NetworkView::Community => {
            let relationships = orchestrator.get_community_network(&item_id, args.depth).await?;
            formatter.format_relationships(&relationships)?
        }
        NetworkView::Hierarchy => {
            let relationships = orchestrator
                .get_traditional_hierarchy(&item_id, args.depth)
                .await?;
            formatter.format_relationships(&relationships)?
        }
    };

    println!("{}", output);
    Ok(())
}
