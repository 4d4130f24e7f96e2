use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisKind, AnalysisRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSuitabilityAnalysis {
    /// 0 – 100
    pub suitability_score: u8,
    pub summary: String,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

impl AnalysisRecord for JobSuitabilityAnalysis {
    const KIND: AnalysisKind = AnalysisKind::Suitability;
}
