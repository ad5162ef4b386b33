//! Knobs shared by the analytics stages.

use serde::{Deserialize, Serialize};

/// Concept label assigned to rubric items with no mapping and no topic.
pub const DEFAULT_UNMAPPED_LABEL: &str = "Unmapped";

/// Edge thresholds for misconception clustering.
///
/// Two rubric items are linked when Jaccard similarity reaches
/// `jaccard_threshold` or the cosine-style correlation reaches
/// `corr_threshold`. Items seen for fewer than `min_support` students are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterThresholds {
    pub jaccard_threshold: f64,
    pub corr_threshold: f64,
    pub min_support: usize,
}

impl Default for ClusterThresholds {
    fn default() -> Self {
        Self {
            jaccard_threshold: 0.2,
            corr_threshold: 0.3,
            min_support: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Explicit exam chronology. Empty means lexicographic order.
    pub exam_order: Vec<String>,
    pub unmapped_label: String,
    /// Number of recommendations to emit.
    pub top_n: usize,
    pub include_unmapped: bool,
    /// Restrict recommendations to these concepts. `None` means no restriction;
    /// a list with no non-blank entries allows nothing.
    pub allowed_concepts: Option<Vec<String>>,
    /// Persistence rate at or above which a concept is re-taught.
    pub persistence_threshold: f64,
    pub cluster: ClusterThresholds,
    /// Histogram bins for the score distribution summary.
    pub distribution_bins: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            exam_order: Vec::new(),
            unmapped_label: DEFAULT_UNMAPPED_LABEL.to_string(),
            top_n: 5,
            include_unmapped: false,
            allowed_concepts: None,
            persistence_threshold: 0.2,
            cluster: ClusterThresholds::default(),
            distribution_bins: 10,
        }
    }
}

impl AnalysisOptions {
    #[must_use]
    pub fn with_exam_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exam_order = order.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    #[must_use]
    pub fn with_include_unmapped(mut self, include: bool) -> Self {
        self.include_unmapped = include;
        self
    }

    #[must_use]
    pub fn with_allowed_concepts<I, S>(mut self, concepts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_concepts = Some(concepts.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_unmapped_label(mut self, label: impl Into<String>) -> Self {
        self.unmapped_label = label.into();
        self
    }

    #[must_use]
    pub fn with_cluster_thresholds(mut self, cluster: ClusterThresholds) -> Self {
        self.cluster = cluster;
        self
    }
}
