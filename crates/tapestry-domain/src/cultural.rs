//! Cultural metadata - informational annotation attached to content
//!
//! Nothing in this module is a permission. The sensitivity level describes
//! the content so that suggestions can carry educational context; it is never
//! consulted to decide whether an item is visible, readable or writable.

use serde::{Deserialize, Serialize};

/// Ordinal cultural sensitivity scale
///
/// Ordering is meaningful (`Public < Community < Guardian < Sacred`) and is
/// used by scoring heuristics only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityLevel {
    /// General audience material
    #[default]
    Public,

    /// Material shared within a community
    Community,

    /// Material with recognised knowledge keepers
    Guardian,

    /// Sacred or ceremonial material
    Sacred,
}

impl SensitivityLevel {
    /// Numeric rank (1-4), exposed to organization rules
    pub fn rank(&self) -> u8 {
        match self {
            SensitivityLevel::Public => 1,
            SensitivityLevel::Community => 2,
            SensitivityLevel::Guardian => 3,
            SensitivityLevel::Sacred => 4,
        }
    }

    /// Get the level name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SensitivityLevel::Public => "public",
            SensitivityLevel::Community => "community",
            SensitivityLevel::Guardian => "guardian",
            SensitivityLevel::Sacred => "sacred",
        }
    }

    /// Parse a level from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "public" => Some(SensitivityLevel::Public),
            "community" => Some(SensitivityLevel::Community),
            "guardian" => Some(SensitivityLevel::Guardian),
            "sacred" => Some(SensitivityLevel::Sacred),
            _ => None,
        }
    }
}

/// Cultural annotation of a content item
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CulturalMetadata {
    /// Informational sensitivity level
    #[serde(default)]
    pub sensitivity_level: SensitivityLevel,

    /// Culture the content originates from
    #[serde(default)]
    pub cultural_origin: Option<String>,

    /// Protocols a learner is asked to observe
    #[serde(default)]
    pub traditional_protocols: Vec<String>,

    /// Explanatory text shown alongside the content
    #[serde(default)]
    pub educational_context: Option<String>,
}

impl CulturalMetadata {
    /// Create metadata with the given sensitivity level
    pub fn new(sensitivity_level: SensitivityLevel) -> Self {
        Self {
            sensitivity_level,
            ..Default::default()
        }
    }

    /// Set the cultural origin
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.cultural_origin = Some(origin.into());
        self
    }

    /// Set the traditional protocols
    pub fn with_protocols<I, S>(mut self, protocols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traditional_protocols = protocols.into_iter().map(Into::into).collect();
        self
    }

    /// Set the educational context
    pub fn with_educational_context(mut self, context: impl Into<String>) -> Self {
        self.educational_context = Some(context.into());
        self
    }
}
