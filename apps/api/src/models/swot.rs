use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisKind, AnalysisRecord};

/// The four SWOT categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwotCategory {
    Strengths,
    Weaknesses,
    Opportunities,
    Threats,
}

/// Display metadata for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryMeta {
    pub title: &'static str,
    pub recommendation_title: &'static str,
    pub accent: &'static str,
}

impl SwotCategory {
    pub const ALL: [SwotCategory; 4] = [
        SwotCategory::Strengths,
        SwotCategory::Weaknesses,
        SwotCategory::Opportunities,
        SwotCategory::Threats,
    ];

    /// JSON key used for this category in model responses.
    pub fn key(&self) -> &'static str {
        match self {
            SwotCategory::Strengths => "strengths",
            SwotCategory::Weaknesses => "weaknesses",
            SwotCategory::Opportunities => "opportunities",
            SwotCategory::Threats => "threats",
        }
    }

    pub fn meta(&self) -> CategoryMeta {
        match self {
            SwotCategory::Strengths => CategoryMeta {
                title: "Strengths",
                recommendation_title: "Leverage Strengths",
                accent: "green",
            },
            SwotCategory::Weaknesses => CategoryMeta {
                title: "Weaknesses",
                recommendation_title: "Address Weaknesses",
                accent: "yellow",
            },
            SwotCategory::Opportunities => CategoryMeta {
                title: "Opportunities",
                recommendation_title: "Seize Opportunities",
                accent: "blue",
            },
            SwotCategory::Threats => CategoryMeta {
                title: "Threats",
                recommendation_title: "Mitigate Threats",
                accent: "red",
            },
        }
    }
}

/// One actionable recommendation per category. All four are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwotRecommendations {
    pub strengths: String,
    pub weaknesses: String,
    pub opportunities: String,
    pub threats: String,
}

impl SwotRecommendations {
    pub fn get(&self, category: SwotCategory) -> &str {
        match category {
            SwotCategory::Strengths => &self.strengths,
            SwotCategory::Weaknesses => &self.weaknesses,
            SwotCategory::Opportunities => &self.opportunities,
            SwotCategory::Threats => &self.threats,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwotAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
    pub recommendations: SwotRecommendations,
}

impl SwotAnalysis {
    pub fn items(&self, category: SwotCategory) -> &[String] {
        match category {
            SwotCategory::Strengths => &self.strengths,
            SwotCategory::Weaknesses => &self.weaknesses,
            SwotCategory::Opportunities => &self.opportunities,
            SwotCategory::Threats => &self.threats,
        }
    }
}

impl AnalysisRecord for SwotAnalysis {
    const KIND: AnalysisKind = AnalysisKind::Swot;
}
