//! Analysis Request Builder: turns raw user input into a prompt plus the
//! response schema the model must satisfy.

use super::prompts::{
    HEADLINE_PROMPT_TEMPLATE, HEADLINE_WITH_JD_PROMPT_TEMPLATE, SUITABILITY_PROMPT_TEMPLATE,
    SWOT_PROMPT_TEMPLATE,
};
use super::schema::{Property, Schema};
use super::AnalysisKind;
use crate::models::swot::SwotCategory;

/// Raw inputs, one variant per analysis kind.
#[derive(Debug, Clone)]
pub enum AnalysisInput {
    Headline {
        headline: String,
        job_description: Option<String>,
    },
    Swot {
        user_info: String,
    },
    Suitability {
        resume_text: String,
        job_description: String,
    },
}

impl AnalysisInput {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisInput::Headline { .. } => AnalysisKind::Headline,
            AnalysisInput::Swot { .. } => AnalysisKind::Swot,
            AnalysisInput::Suitability { .. } => AnalysisKind::Suitability,
        }
    }
}

/// Which headline template was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadlineVariant {
    /// No job description: missing skills are always empty.
    Bare,
    /// Tailored to a non-blank job description.
    Tailored,
}

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub kind: AnalysisKind,
    pub prompt: String,
    pub schema: Schema,
    /// Set for headline requests only.
    pub headline_variant: Option<HeadlineVariant>,
}

/// Builds the prompt and response schema for one analysis.
pub fn build_request(input: AnalysisInput) -> AnalysisRequest {
    let kind = input.kind();
    match input {
        AnalysisInput::Headline {
            headline,
            job_description,
        } => {
            let job_description = job_description.filter(|jd| !jd.trim().is_empty());
            let (variant, prompt) = match job_description {
                Some(jd) => (
                    HeadlineVariant::Tailored,
                    fill_template(
                        HEADLINE_WITH_JD_PROMPT_TEMPLATE,
                        &[("headline", headline.as_str()), ("job_description", jd.as_str())],
                    ),
                ),
                None => (
                    HeadlineVariant::Bare,
                    fill_template(HEADLINE_PROMPT_TEMPLATE, &[("headline", headline.as_str())]),
                ),
            };
            AnalysisRequest {
                kind,
                prompt,
                schema: headline_schema(variant),
                headline_variant: Some(variant),
            }
        }
        AnalysisInput::Swot { user_info } => AnalysisRequest {
            kind,
            prompt: fill_template(SWOT_PROMPT_TEMPLATE, &[("user_info", user_info.as_str())]),
            schema: swot_schema(),
            headline_variant: None,
        },
        AnalysisInput::Suitability {
            resume_text,
            job_description,
        } => AnalysisRequest {
            kind,
            prompt: fill_template(
                SUITABILITY_PROMPT_TEMPLATE,
                &[
                    ("resume_text", resume_text.as_str()),
                    ("job_description", job_description.as_str()),
                ],
            ),
            schema: suitability_schema(),
            headline_variant: None,
        },
    }
}

/// Replaces `{name}` placeholders in one pass. Substituted text is never
/// rescanned, and unknown placeholders are left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let substituted = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match substituted {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

const QUALITY_VALUES: &[&str] = &["Strong", "Medium", "Weak"];

fn headline_schema(variant: HeadlineVariant) -> Schema {
    let missing_skills_description = match variant {
        HeadlineVariant::Tailored => {
            "A list of 2-3 critical keywords or skills from the job description that are \
             missing from the headline. This should be an empty array if no critical skills are missing."
        }
        HeadlineVariant::Bare => {
            "Always an empty array: no job description was provided."
        }
    };
    let suggestions_description = match variant {
        HeadlineVariant::Tailored => "3 improved headline suggestions, tailored to the job description.",
        HeadlineVariant::Bare => "3 improved headline suggestions.",
    };

    Schema::object(vec![
        Property::required(
            "quality",
            Schema::enumeration(QUALITY_VALUES, "The overall quality of the headline."),
        ),
        Property::required(
            "analysis",
            Schema::string(
                "A summary of the headline's strengths and weaknesses, considering the job \
                 description if provided.",
            ),
        ),
        Property::required(
            "missingSkills",
            Schema::string_list(missing_skills_description),
        ),
        Property::required("suggestions", Schema::string_list(suggestions_description)),
    ])
}

fn swot_schema() -> Schema {
    let mut properties: Vec<Property> = SwotCategory::ALL
        .iter()
        .map(|c| Property::required(c.key(), Schema::string_list(list_description(*c))))
        .collect();

    let recommendations = SwotCategory::ALL
        .iter()
        .map(|c| Property::required(c.key(), Schema::string(recommendation_description(*c))))
        .collect();
    properties.push(Property::required(
        "recommendations",
        Schema::object(recommendations),
    ));

    Schema::object(properties)
}

fn list_description(category: SwotCategory) -> &'static str {
    match category {
        SwotCategory::Strengths => "List of personal strengths derived from the user input.",
        SwotCategory::Weaknesses => "List of personal weaknesses derived from the user input.",
        SwotCategory::Opportunities => {
            "List of potential opportunities based on the user input and market trends."
        }
        SwotCategory::Threats => {
            "List of potential threats or challenges based on the user input."
        }
    }
}

fn recommendation_description(category: SwotCategory) -> &'static str {
    match category {
        SwotCategory::Strengths => "Actionable advice on how to leverage strengths.",
        SwotCategory::Weaknesses => "Actionable advice on how to mitigate weaknesses.",
        SwotCategory::Opportunities => "Actionable advice on how to seize opportunities.",
        SwotCategory::Threats => "Actionable advice on how to navigate threats.",
    }
}

fn suitability_schema() -> Schema {
    Schema::object(vec![
        Property::required(
            "suitabilityScore",
            Schema::integer(
                0,
                100,
                "A score from 0 to 100 indicating the match between the resume and job description.",
            ),
        ),
        Property::required(
            "summary",
            Schema::string(
                "A brief text summary explaining the score and the candidate's overall fit.",
            ),
        ),
        Property::required(
            "matchingSkills",
            Schema::string_list(
                "A list of key skills found in both the resume and the job description.",
            ),
        ),
        Property::required(
            "missingSkills",
            Schema::string_list(
                "A list of key skills required by the job description but not found in the resume.",
            ),
        ),
    ])
}
