//! Output formatting for the CLI.

use crate::error::Result;
use colored::*;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use tapestry_domain::{
    CategorySuggestion, CulturalCluster, EducationalPathway, OrganizationAnalysis, Relationship,
    RelationshipNetwork, RelationshipSuggestion, SmartOrganizationConfig, TagSuggestion,
    ValidationStatus,
};
use tapestry_orchestrator::{BatchReport, OrganizationOutcome};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render any record as pretty JSON.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    /// Format a batch of analyses.
    pub fn format_analyses(&self, report: &BatchReport<OrganizationAnalysis>) -> Result<String> {
        if self.format == OutputFormat::Json {
            return self.json(report);
        }

        let mut builder = Builder::default();
        builder.push_record(["Item", "Tags", "Categories", "Rule Matches", "Confidence"]);
        for analysis in report.succeeded() {
            let tags: Vec<String> = analysis
                .suggested_tags
                .iter()
                .map(|t| {
                    let marker = if t.traditional_knowledge { "*" } else { "" };
                    format!("{}{} ({:.2})", t.tag, marker, t.confidence)
                })
                .collect();
            let categories: Vec<String> = analysis
                .suggested_categories
                .iter()
                .map(|c| {
                    let review = if c.requires_community_validation { ", review" } else { "" };
                    format!("{} ({:.2}{})", c.category, c.confidence, review)
                })
                .collect();
            let rules: Vec<&str> = analysis.rule_matches.iter().map(|m| m.rule_id.as_str()).collect();

            builder.push_record([
                analysis.item_id.to_string(),
                tags.join("\n"),
                categories.join("\n"),
                rules.join(", "),
                format!("{:.2}", analysis.overall_confidence),
            ]);
        }

        Ok(self.with_failures(self.table(builder), report))
    }

    /// Format a batch of organization outcomes.
    pub fn format_outcomes(&self, report: &BatchReport<OrganizationOutcome>) -> Result<String> {
        if self.format == OutputFormat::Json {
            return self.json(report);
        }

        let mut builder = Builder::default();
        builder.push_record(["Item", "Tags", "Categories", "Cultural", "Actions", "Review"]);
        for outcome in report.succeeded() {
            let actions: Vec<String> = outcome
                .executed_actions
                .iter()
                .map(|a| format!("{}: {}", a.type_name(), a.value()))
                .collect();
            builder.push_record([
                outcome.item_id.to_string(),
                outcome.applied_tags.join(", "),
                outcome.applied_categories.join(", "),
                yes_no(outcome.cultural_metadata_applied).to_string(),
                actions.join("\n"),
                yes_no(outcome.validation_requested).to_string(),
            ]);
        }

        Ok(self.with_failures(self.table(builder), report))
    }

    /// Format a relationship network with its statistics.
    pub fn format_network(&self, network: &RelationshipNetwork) -> Result<String> {
        if self.format == OutputFormat::Json {
            return self.json(network);
        }

        let stats = &network.statistics;
        let header = self.info(&format!(
            "Network around {} (depth {}): {} nodes, {} direct, {} indirect",
            network.center_id,
            network.depth,
            stats.total_nodes,
            stats.direct_relationships,
            stats.indirect_relationships
        ));
        let summary = format!(
            "Diversity {:.2}, community participation {:.2}, average strength {:.2}",
            stats.cultural_diversity, stats.community_participation, stats.average_strength
        );

        let edges = network
            .direct
            .iter()
            .map(|r| (1, r))
            .chain(network.indirect.iter().map(|i| (i.depth, &i.relationship)));
        let mut sections = vec![header, summary, self.relationship_table(edges)];
        if !network.cultural_clusters.is_empty() {
            sections.push(self.cluster_table(&network.cultural_clusters));
        }
        Ok(sections.join("\n"))
    }

    /// Format cultural clusters.
    pub fn format_clusters(&self, clusters: &[CulturalCluster]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return self.json(clusters);
        }
        if clusters.is_empty() {
            return Ok(self.warning("No cultural clusters found."));
        }
        Ok(self.cluster_table(clusters))
    }

    /// Format a list of relationships.
    pub fn format_relationships(&self, relationships: &[Relationship]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return self.json(relationships);
        }
        if relationships.is_empty() {
            return Ok(self.warning("No relationships found."));
        }
        Ok(self.relationship_table(relationships.iter().map(|r| (1, r))))
    }

    /// Format learning pathways.
    pub fn format_pathways(&self, pathways: &[EducationalPathway]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return self.json(pathways);
        }
        if pathways.is_empty() {
            return Ok(self.warning("No pathways found."));
        }

        let mut builder = Builder::default();
        builder.push_record(["Title", "Items", "Goals", "Requirements"]);
        for pathway in pathways {
            let items: Vec<String> = pathway.items.iter().map(|i| i.to_string()).collect();
            builder.push_record([
                pathway.title.clone(),
                items.join(" → "),
                pathway.cultural_learning_goals.join("\n"),
                pathway.cultural_requirements.join("\n"),
            ]);
        }
        Ok(self.table(builder))
    }

    /// Format tag suggestions.
    pub fn format_tag_suggestions(&self, tags: &[TagSuggestion]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return self.json(tags);
        }
        if tags.is_empty() {
            return Ok(self.warning("No tag suggestions."));
        }

        let mut builder = Builder::default();
        builder.push_record(["Tag", "Confidence", "Source", "Traditional", "Reason"]);
        for tag in tags {
            builder.push_record([
                tag.tag.clone(),
                format!("{:.2}", tag.confidence),
                format!("{:?}", tag.source),
                yes_no(tag.traditional_knowledge).to_string(),
                tag.reason.clone(),
            ]);
        }
        Ok(self.table(builder))
    }

    /// Format category suggestions.
    pub fn format_category_suggestions(&self, categories: &[CategorySuggestion]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return self.json(categories);
        }
        if categories.is_empty() {
            return Ok(self.warning("No category suggestions."));
        }

        let mut builder = Builder::default();
        builder.push_record(["Category", "Confidence", "Appropriateness", "Review"]);
        for category in categories {
            builder.push_record([
                category.category.clone(),
                format!("{:.2}", category.confidence),
                format!("{:.2}", category.cultural_appropriateness),
                yes_no(category.requires_community_validation).to_string(),
            ]);
        }
        Ok(self.table(builder))
    }

    /// Format relationship candidates.
    pub fn format_relationship_suggestions(
        &self,
        suggestions: &[RelationshipSuggestion],
    ) -> Result<String> {
        if self.format == OutputFormat::Json {
            return self.json(suggestions);
        }
        if suggestions.is_empty() {
            return Ok(self.warning("No relationship suggestions."));
        }

        let mut builder = Builder::default();
        builder.push_record(["Target", "Type", "Confidence", "Appropriateness", "Review"]);
        for suggestion in suggestions {
            builder.push_record([
                suggestion.target_id.to_string(),
                suggestion.relationship_type.to_string(),
                format!("{:.2}", suggestion.confidence),
                format!("{:.2}", suggestion.cultural_appropriateness),
                yes_no(suggestion.requires_community_validation).to_string(),
            ]);
        }
        Ok(self.table(builder))
    }

    /// Format organization settings.
    pub fn format_settings(&self, settings: &SmartOrganizationConfig) -> Result<String> {
        if self.format == OutputFormat::Json {
            return self.json(settings);
        }

        let mut builder = Builder::default();
        builder.push_record(["Setting", "Value"]);
        let rows = [
            ("auto_tagging", settings.auto_tagging.to_string()),
            ("auto_tagging_threshold", format!("{:.2}", settings.auto_tagging_threshold)),
            ("smart_categorization", settings.smart_categorization.to_string()),
            ("categorization_threshold", format!("{:.2}", settings.categorization_threshold)),
            ("cultural_analysis", settings.cultural_analysis.to_string()),
            ("require_cultural_validation", settings.require_cultural_validation.to_string()),
            ("community_input", settings.community_input.to_string()),
            ("learning_enabled", settings.learning_enabled.to_string()),
            ("batch_size", settings.batch_processing.batch_size.to_string()),
        ];
        for (name, value) in rows {
            builder.push_record([name.to_string(), value]);
        }
        Ok(self.table(builder))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    fn relationship_table<'a>(&self, edges: impl Iterator<Item = (usize, &'a Relationship)>) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Depth", "Source", "Type", "Target", "Strength", "Status"]);
        for (depth, relationship) in edges {
            let arrow = if relationship.bidirectional { "↔" } else { "→" };
            builder.push_record([
                depth.to_string(),
                relationship.source_id.to_string(),
                format!("{} {}", arrow, relationship.relationship_type),
                relationship.target_id.to_string(),
                format!("{:.2}", relationship.strength),
                status_label(relationship.validation_status).to_string(),
            ]);
        }
        self.table(builder)
    }

    fn cluster_table(&self, clusters: &[CulturalCluster]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Origin", "Center", "Items", "Significance"]);
        for cluster in clusters {
            let items: Vec<String> = cluster.items.iter().map(|i| i.to_string()).collect();
            builder.push_record([
                cluster.cultural_origin.clone(),
                cluster.center_item.to_string(),
                items.join(", "),
                format!("{:.2}", cluster.cultural_significance),
            ]);
        }
        self.table(builder)
    }

    fn with_failures<T>(&self, table: String, report: &BatchReport<T>) -> String {
        let mut lines = vec![table];
        for (item_id, error) in report.failed() {
            lines.push(self.error(&format!("{}: {}", item_id, error)));
        }
        lines.join("\n")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn status_label(status: ValidationStatus) -> &'static str {
    match status {
        ValidationStatus::Pending => "pending",
        ValidationStatus::Validated => "validated",
        ValidationStatus::CommunityReview => "community review",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapestry_domain::{ItemType, RelationshipType, TagSource};

    fn create_test_analysis() -> OrganizationAnalysis {
        let mut analysis = OrganizationAnalysis::empty("doc-1".into(), ItemType::Document);
        analysis.suggested_tags = vec![
            TagSuggestion::new("weaving", 0.9, "", TagSource::ContentAnalysis),
            TagSuggestion::new("elder teachings", 0.95, "", TagSource::CulturalAnalysis).traditional(),
        ];
        analysis.overall_confidence = 0.46;
        analysis
    }

    fn create_test_report() -> BatchReport<OrganizationAnalysis> {
        serde_json::from_value(serde_json::json!({
            "chunk_sizes": [2],
            "items": [
                {"item_id": "doc-1", "value": serde_json::to_value(create_test_analysis()).unwrap()},
                {"item_id": "doc-2", "error": "Unable to analyze item for organization"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_analysis_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_analyses(&create_test_report()).unwrap();

        assert!(output.contains("Confidence"));
        assert!(output.contains("weaving (0.90)"));
        assert!(output.contains("elder teachings* (0.95)"));
        assert!(output.contains("✗ doc-2: Unable to analyze item for organization"));
    }

    #[test]
    fn test_analysis_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_analyses(&create_test_report()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["chunk_sizes"], serde_json::json!([2]));
        assert_eq!(value["items"][0]["value"]["item_id"], "doc-1");
        assert_eq!(value["items"][1]["error"], "Unable to analyze item for organization");
    }

    #[test]
    fn test_relationships_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let relationship = Relationship::new("a".into(), "b".into(), RelationshipType::Sibling, 0.8, 0);
        let output = formatter.format_relationships(&[relationship]).unwrap();

        assert!(output.contains("↔ sibling"));
        assert!(output.contains("0.80"));
        assert!(output.contains("pending"));
    }

    #[test]
    fn test_empty_lists() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert!(formatter.format_pathways(&[]).unwrap().contains("No pathways found"));
        assert!(formatter.format_relationships(&[]).unwrap().contains("No relationships found"));

        let json = Formatter::new(OutputFormat::Json, false);
        assert_eq!(json.format_pathways(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_settings_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_settings(&SmartOrganizationConfig::default()).unwrap();
        assert!(output.contains("auto_tagging_threshold"));
        assert!(output.contains("0.80"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
