//! JSON fixtures for seeding an in-memory backend

use crate::{BackendError, InMemoryBackend, SuggestionKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tapestry_domain::{
    ContentItem, CulturalMetadata, ItemId, OrganizationAnalysis, OrganizationRule,
    RawCategorySuggestion, Relationship, RelationshipSuggestion, SmartOrganizationConfig,
    TagSuggestion,
};

/// Seed data for an [`InMemoryBackend`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendFixture {
    /// Content items
    pub items: Vec<ContentItem>,

    /// Existing relationships
    pub relationships: Vec<Relationship>,

    /// Existing organization rules
    pub rules: Vec<OrganizationRule>,

    /// Scripted analysis results per item
    pub analyses: HashMap<ItemId, OrganizationAnalysis>,

    /// Scripted tag suggestions per item
    pub tag_suggestions: HashMap<ItemId, Vec<TagSuggestion>>,

    /// Scripted category suggestions per item
    pub category_suggestions: HashMap<ItemId, Vec<RawCategorySuggestion>>,

    /// Scripted cultural context per item
    pub cultural_contexts: HashMap<ItemId, CulturalMetadata>,

    /// Scripted relationship candidates per item
    pub relationship_suggestions: HashMap<ItemId, Vec<RelationshipSuggestion>>,

    /// Scripted cultural variants per item
    pub cultural_variants: HashMap<ItemId, Vec<RelationshipSuggestion>>,

    /// Scripted community responses per item
    pub community_responses: HashMap<ItemId, Vec<RelationshipSuggestion>>,

    /// Protocols per cultural origin
    pub protocols: HashMap<String, Vec<String>>,

    /// Initial organization settings
    pub config: Option<SmartOrganizationConfig>,
}

impl BackendFixture {
    /// Parse a fixture from JSON text
    pub fn from_json(json: &str) -> Result<Self, BackendError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a backend seeded with this fixture
    pub fn into_backend(self) -> InMemoryBackend {
        let backend = InMemoryBackend::new();

        for item in self.items {
            backend.add_item(item);
        }
        for relationship in self.relationships {
            backend.add_relationship(relationship);
        }
        for rule in self.rules {
            backend.add_rule(rule);
        }
        for (item_id, analysis) in self.analyses {
            backend.script_analysis(item_id, analysis);
        }
        for (item_id, tags) in self.tag_suggestions {
            backend.script_tag_suggestions(item_id, tags);
        }
        for (item_id, categories) in self.category_suggestions {
            backend.script_category_suggestions(item_id, categories);
        }
        for (item_id, context) in self.cultural_contexts {
            backend.script_cultural_context(item_id, context);
        }
        let scripted = [
            (SuggestionKind::Related, self.relationship_suggestions),
            (SuggestionKind::CulturalVariant, self.cultural_variants),
            (SuggestionKind::CommunityResponse, self.community_responses),
        ];
        for (kind, by_item) in scripted {
            for (item_id, suggestions) in by_item {
                backend.script_relationship_suggestions(kind, item_id, suggestions);
            }
        }
        for (origin, protocols) in self.protocols {
            backend.set_cultural_protocols(origin, protocols);
        }
        if let Some(config) = self.config {
            backend.set_config(config);
        }

        backend
    }
}
