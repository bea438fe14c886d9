//! Smart organization settings shared with the backend

use serde::{Deserialize, Serialize};

/// Batch processing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchProcessingConfig {
    /// Whether batch processing is enabled
    pub enabled: bool,

    /// Items per chunk
    pub batch_size: usize,

    /// Pause between chunks (milliseconds)
    pub processing_interval_ms: u64,
}

impl Default for BatchProcessingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            batch_size: 10,
            processing_interval_ms: 100,
        }
    }
}

/// Settings controlling automatic organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartOrganizationConfig {
    /// Apply suggested tags automatically
    pub auto_tagging: bool,

    /// Minimum tag confidence for automatic application
    pub auto_tagging_threshold: f64,

    /// Apply suggested categories automatically
    pub smart_categorization: bool,

    /// Minimum category confidence for automatic application
    pub categorization_threshold: f64,

    /// Run cultural context analysis
    pub cultural_analysis: bool,

    /// Ask for community review of flagged categories
    pub require_cultural_validation: bool,

    /// Accept community-sourced suggestions
    pub community_input: bool,

    /// Record user corrections for learning
    pub learning_enabled: bool,

    /// Batch settings
    pub batch_processing: BatchProcessingConfig,
}

impl Default for SmartOrganizationConfig {
    fn default() -> Self {
        Self {
            auto_tagging: true,
            auto_tagging_threshold: 0.8,
            smart_categorization: true,
            categorization_threshold: 0.7,
            cultural_analysis: true,
            require_cultural_validation: false,
            community_input: true,
            learning_enabled: true,
            batch_processing: BatchProcessingConfig::default(),
        }
    }
}

/// Partial update of [`SmartOrganizationConfig`]; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationConfigUpdate {
    /// New `auto_tagging`
    pub auto_tagging: Option<bool>,
    /// New `auto_tagging_threshold`
    pub auto_tagging_threshold: Option<f64>,
    /// New `smart_categorization`
    pub smart_categorization: Option<bool>,
    /// New `categorization_threshold`
    pub categorization_threshold: Option<f64>,
    /// New `cultural_analysis`
    pub cultural_analysis: Option<bool>,
    /// New `require_cultural_validation`
    pub require_cultural_validation: Option<bool>,
    /// New `community_input`
    pub community_input: Option<bool>,
    /// New `learning_enabled`
    pub learning_enabled: Option<bool>,
    /// New batch settings
    pub batch_processing: Option<BatchProcessingConfig>,
}

impl SmartOrganizationConfig {
    /// Apply a partial update in place
    pub fn apply(&mut self, update: &OrganizationConfigUpdate) {
        if let Some(v) = update.auto_tagging {
            self.auto_tagging = v;
        }
        if let Some(v) = update.auto_tagging_threshold {
            self.auto_tagging_threshold = v;
        }
        if let Some(v) = update.smart_categorization {
            self.smart_categorization = v;
        }
        if let Some(v) = update.categorization_threshold {
            self.categorization_threshold = v;
        }
        if let Some(v) = update.cultural_analysis {
            self.cultural_analysis = v;
        }
        if let Some(v) = update.require_cultural_validation {
            self.require_cultural_validation = v;
        }
        if let Some(v) = update.community_input {
            self.community_input = v;
        }
        if let Some(v) = update.learning_enabled {
            self.learning_enabled = v;
        }
        if let Some(batch) = &update.batch_processing {
            self.batch_processing = batch.clone();
        }
    }
}
