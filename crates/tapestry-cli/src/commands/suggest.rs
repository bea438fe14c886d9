//! Suggest command implementation.

use crate::cli::{SuggestArgs, SuggestKindArg};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::Session;
use tapestry_domain::ItemId;

/// Execute the suggest command.
pub async fn execute_suggest(args: SuggestArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    if args.limit == Some(0) {
        return Err(CliError::InvalidInput("Limit must be at least 1".to_string()));
    }

    let item_id = ItemId::new(args.id.as_str());
    let orchestrator = &session.orchestrator;

    let output = match args.kind {
        SuggestKindArg::Tags => {
            let item = orchestrator.get_content_item(&item_id).await?;
            let tags = orchestrator.generate_tag_suggestions(&item, None).await?;
            formatter.format_tag_suggestions(&tags)?
        }
        SuggestKindArg::Categories => {
            let item = orchestrator.get_content_item(&item_id).await?;
            let categories = orchestrator.generate_category_suggestions(&item, None).await?;
            formatter.format_category_suggestions(&categories)?
        }
        SuggestKindArg::Relationships => {
            let suggestions = orchestrator.suggest_relationships(&item_id).await?;
            formatter.format_relationship_suggestions(&suggestions)?
        }
        SuggestKindArg::Similar => {
            let suggestions = orchestrator
                .find_similar_collections(&item_id, args.limit)
                .await?;
            formatter.format_relationship_suggestions(&suggestions)?
        }
        SuggestKindArg::Variants => {
            let suggestions = orchestrator.discover_cultural_variants(&item_id).await?;
            formatter.format_relationship_suggestions(&suggestions)?
        }
        SuggestKindArg::Responses => {
            let suggestions = orchestrator.find_community_responses(&item_id).await?;
            formatter.format_relationship_suggestions(&suggestions)?
        }
    };

    println!("{}", output);
    Ok(())
}
