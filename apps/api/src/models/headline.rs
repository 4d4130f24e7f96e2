use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisKind, AnalysisRecord, AnalysisRequest, HeadlineVariant};

/// Overall quality verdict for a headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadlineQuality {
    Strong,
    Medium,
    Weak,
}

impl HeadlineQuality {
    pub const ALL: [HeadlineQuality; 3] = [
        HeadlineQuality::Strong,
        HeadlineQuality::Medium,
        HeadlineQuality::Weak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HeadlineQuality::Strong => "Strong",
            HeadlineQuality::Medium => "Medium",
            HeadlineQuality::Weak => "Weak",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineAnalysis {
    pub quality: HeadlineQuality,
    pub analysis: String,
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
}

impl AnalysisRecord for HeadlineAnalysis {
    const KIND: AnalysisKind = AnalysisKind::Headline;

    fn conform(&mut self, request: &AnalysisRequest) {
        // Without a job description there is nothing to be missing from.
        if request.headline_variant == Some(HeadlineVariant::Bare) {
            self.missing_skills.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserializes_camel_case_fields() {
        let parsed: HeadlineAnalysis = serde_json::from_value(json!({
            "quality": "Medium",
            "analysis": "Clear but generic.",
            "suggestions": ["Rust Engineer | Distributed Systems"],
            "missingSkills": ["Kubernetes"]
        }))
        .unwrap();

        assert_eq!(parsed.quality, HeadlineQuality::Medium);
        assert_eq!(parsed.missing_skills, vec!["Kubernetes".to_string()]);
    }

    #[test]
    fn test_missing_skills_default_to_empty() {
        let parsed: HeadlineAnalysis = serde_json::from_value(json!({
            "quality": "Strong",
            "analysis": "Great.",
            "suggestions": []
        }))
        .unwrap();
        assert!(parsed.missing_skills.is_empty());
    }

    #[test]
    fn test_quality_outside_enumeration_is_rejected() {
        let result = serde_json::from_value::<HeadlineAnalysis>(json!({
            "quality": "Excellent",
            "analysis": "",
            "suggestions": []
        }));
        assert!(result.is_err());
    }
}
