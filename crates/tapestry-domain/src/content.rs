//! Content items - the documents and collections the engine organizes

use crate::CulturalMetadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque identifier of a content item
///
/// The engine never interprets the identifier; it is minted by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap a backend identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Discriminator for content items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// A single document
    Document,

    /// A collection of documents
    Collection,
}

impl ItemType {
    /// Get the item type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Document => "document",
            ItemType::Collection => "collection",
        }
    }

    /// Parse an item type from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "document" => Some(ItemType::Document),
            "collection" => Some(ItemType::Collection),
            _ => None,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid item type: {}", s))
    }
}

/// Value of an item field as seen by the rule engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Numeric value
    Number(f64),

    /// Free text
    Text(String),

    /// List of strings (tags, categories, protocols)
    List(Vec<String>),
}

impl FieldValue {
    /// Numeric view of the value, parsing text when possible
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::List(_) => None,
        }
    }
}

/// A document or collection read (and annotated) by the engine
///
/// Items are created and edited externally. The engine reads them and hands
/// annotations back to the backend; it never decides who may see them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Unique identifier
    pub id: ItemId,

    /// Document or collection
    pub item_type: ItemType,

    /// Human-readable title
    #[serde(default)]
    pub title: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Body text (may be empty for collections)
    #[serde(default)]
    pub content: String,

    /// Tags currently applied
    #[serde(default)]
    pub tags: Vec<String>,

    /// Categories currently applied
    #[serde(default)]
    pub categories: Vec<String>,

    /// Collection this item belongs to, if any
    #[serde(default)]
    pub collection_id: Option<ItemId>,

    /// Cultural annotation (informational only)
    #[serde(default)]
    pub cultural: Option<CulturalMetadata>,

    /// Additional fields available to organization rules
    #[serde(default)]
    pub attributes: BTreeMap<String, FieldValue>,
}

impl ContentItem {
    /// Create an empty item of the given type
    pub fn new(id: impl Into<ItemId>, item_type: ItemType) -> Self {
        Self {
            id: id.into(),
            item_type,
            title: String::new(),
            description: String::new(),
            content: String::new(),
            tags: Vec::new(),
            categories: Vec::new(),
            collection_id: None,
            cultural: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the body text
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Attach cultural metadata
    pub fn with_cultural(mut self, cultural: CulturalMetadata) -> Self {
        self.cultural = Some(cultural);
        self
    }

    /// Set the applied tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Add a free-form attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Cultural origin, when the item declares one
    pub fn cultural_origin(&self) -> Option<&str> {
        self.cultural.as_ref().and_then(|c| c.cultural_origin.as_deref())
    }

    /// Resolve a rule field against this item
    ///
    /// Built-in fields take precedence over attributes with the same name.
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Text(self.id.to_string())),
            "type" | "item_type" => Some(FieldValue::Text(self.item_type.as_str().to_string())),
            "title" => Some(FieldValue::Text(self.title.clone())),
            "description" => Some(FieldValue::Text(self.description.clone())),
            "content" => Some(FieldValue::Text(self.content.clone())),
            "tags" => Some(FieldValue::List(self.tags.clone())),
            "categories" => Some(FieldValue::List(self.categories.clone())),
            "collection_id" => self
                .collection_id
                .as_ref()
                .map(|c| FieldValue::Text(c.to_string())),
            "cultural_origin" => self.cultural_origin().map(|o| FieldValue::Text(o.to_string())),
            "sensitivity_level" => self
                .cultural
                .as_ref()
                .map(|c| FieldValue::Number(c.sensitivity_level.rank() as f64)),
            "traditional_protocols" => self
                .cultural
                .as_ref()
                .map(|c| FieldValue::List(c.traditional_protocols.clone())),
            other => self.attributes.get(other).cloned(),
        }
    }
}

/// Field names resolved directly from [`ContentItem`] rather than its attributes
pub const BUILT_IN_FIELDS: [&str; 12] = [
    "id",
    "type",
    "item_type",
    "title",
    "description",
    "content",
    "tags",
    "categories",
    "collection_id",
    "cultural_origin",
    "sensitivity_level",
    "traditional_protocols",
];
