//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::{CliError, Result};
use crate::output::{Formatter, OutputFormat};
use crate::session::Session;
use tapestry_domain::OrganizationConfigUpdate;
use tapestry_orchestrator::OrchestratorConfig;

/// Execute the config command.
pub async fn execute_config(args: ConfigArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    match args.action {
        ConfigAction::Show => show(session, formatter).await,
        ConfigAction::Preset { preset } => {
            let config: OrchestratorConfig = preset.into();
            match formatter.format() {
                OutputFormat::Json => println!("{}", formatter.json(&config)?),
                OutputFormat::Table => println!("{}", config.to_toml()?),
            }
            Ok(())
        }
        ConfigAction::Set {
            auto_tagging_threshold,
            categorization_threshold,
            require_cultural_validation,
            learning_enabled,
        } => {
            let update = OrganizationConfigUpdate {
                auto_tagging_threshold,
                categorization_threshold,
                require_cultural_validation,
                learning_enabled,
                ..Default::default()
            };
            if update == OrganizationConfigUpdate::default() {
                return Err(CliError::InvalidInput("Nothing to set".to_string()));
            }

            let settings = session.orchestrator.update_organization_config(&update).await?;
            if formatter.format() == OutputFormat::Table {
                println!("{}", formatter.success("Organization settings updated"));
            }
            println!("{}", formatter.format_settings(&settings)?);
            Ok(())
        }
    }
}

async fn show(session: &Session, formatter: &Formatter) -> Result<()> {
    let engine = session.orchestrator.config();
    let settings = session.orchestrator.get_organization_config().await?;

    match formatter.format() {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "engine": engine,
                "settings": settings,
            });
            println!("{}", formatter.json(&value)?);
        }
        OutputFormat::Table => {
            println!("{}", formatter.info("Engine configuration"));
            println!("{}", engine.to_toml()?);
            println!("{}", formatter.info("Organization settings"));
            println!("{}", formatter.format_settings(&settings)?);
        }
    }
    Ok(())
}
