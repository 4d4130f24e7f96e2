//! View models: typed results plus the presentation metadata a client needs
//! to render them, and a plain-text report rendering of each.

use std::fmt::Write as _;

use serde::Serialize;

use crate::models::headline::{HeadlineAnalysis, HeadlineQuality};
use crate::models::suitability::JobSuitabilityAnalysis;
use crate::models::swot::{SwotAnalysis, SwotCategory};

pub const NO_SWOT_ITEMS: &str = "No items identified.";
pub const NO_MATCHING_SKILLS: &str = "No direct skill matches found.";
pub const NO_MISSING_SKILLS: &str = "No critical missing skills identified.";

// ────────────────────────────────────────────────────────────────────────────
// Score bands
// ────────────────────────────────────────────────────────────────────────────

/// Presentation bucket for a suitability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Low,
    Mid,
    High,
}

impl ScoreBand {
    /// `<50` low, `50..=74` mid, `>=75` high.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=49 => ScoreBand::Low,
            50..=74 => ScoreBand::Mid,
            _ => ScoreBand::High,
        }
    }

    pub fn accent(&self) -> &'static str {
        match self {
            ScoreBand::Low => "red",
            ScoreBand::Mid => "yellow",
            ScoreBand::High => "green",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreBand::Low => "low",
            ScoreBand::Mid => "mid",
            ScoreBand::High => "high",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Keyword highlighting
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSegment {
    pub text: String,
    pub highlighted: bool,
}

/// Splits `text` into plain and highlighted segments. Keywords match
/// case-insensitively anywhere in the text; longer keywords win over shorter
/// ones that start at the same position.
pub fn highlight_keywords(text: &str, keywords: &[String]) -> Vec<TextSegment> {
    let mut sorted: Vec<&str> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    sorted.sort_by_key(|k| std::cmp::Reverse(k.chars().count()));

    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while pos < text.len() {
        let matched = sorted
            .iter()
            .find_map(|k| match_len_ignore_case(&text[pos..], k));

        match matched {
            Some(len) => {
                if plain_start < pos {
                    segments.push(TextSegment {
                        text: text[plain_start..pos].to_string(),
                        highlighted: false,
                    });
                }
                segments.push(TextSegment {
                    text: text[pos..pos + len].to_string(),
                    highlighted: true,
                });
                pos += len;
                plain_start = pos;
            }
            None => {
                pos += text[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if plain_start < text.len() {
        segments.push(TextSegment {
            text: text[plain_start..].to_string(),
            highlighted: false,
        });
    }
    segments
}

/// Byte length of the prefix of `haystack` equal to `needle` ignoring case.
fn match_len_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let mut consumed = 0;
    let mut hay = haystack.chars();
    for n in needle.chars() {
        let h = hay.next()?;
        if !h.to_lowercase().eq(n.to_lowercase()) {
            return None;
        }
        consumed += h.len_utf8();
    }
    Some(consumed)
}

fn render_segments(segments: &[TextSegment]) -> String {
    segments
        .iter()
        .map(|s| {
            if s.highlighted {
                format!("**{}**", s.text)
            } else {
                s.text.clone()
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Headline
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct HeadlineView {
    pub result: HeadlineAnalysis,
    pub quality_accent: &'static str,
    pub suggestions: Vec<Vec<TextSegment>>,
}

fn quality_accent(quality: HeadlineQuality) -> &'static str {
    match quality {
        HeadlineQuality::Strong => "green",
        HeadlineQuality::Medium => "yellow",
        HeadlineQuality::Weak => "red",
    }
}

impl From<HeadlineAnalysis> for HeadlineView {
    fn from(result: HeadlineAnalysis) -> Self {
        let suggestions = result
            .suggestions
            .iter()
            .map(|s| highlight_keywords(s, &result.missing_skills))
            .collect();

        Self {
            quality_accent: quality_accent(result.quality),
            suggestions,
            result,
        }
    }
}

impl HeadlineView {
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Overall Quality: {}", self.result.quality.as_str());
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.result.analysis);
        let _ = writeln!(out);
        let _ = writeln!(out, "Suggested Headlines");
        if !self.result.missing_skills.is_empty() {
            let _ = writeln!(
                out,
                "Keywords to add: {}",
                self.result.missing_skills.join(", ")
            );
        }
        for (i, segments) in self.suggestions.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, render_segments(segments));
        }
        out
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SWOT
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SwotQuadrant {
    pub category: SwotCategory,
    pub title: &'static str,
    pub accent: &'static str,
    pub items: Vec<String>,
    /// Set when the category has no items.
    pub placeholder: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationCard {
    pub category: SwotCategory,
    pub title: &'static str,
    pub accent: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SwotView {
    pub result: SwotAnalysis,
    pub quadrants: Vec<SwotQuadrant>,
    pub recommendations: Vec<RecommendationCard>,
}

impl From<SwotAnalysis> for SwotView {
    fn from(result: SwotAnalysis) -> Self {
        let quadrants = SwotCategory::ALL
            .iter()
            .map(|&category| {
                let meta = category.meta();
                let items = result.items(category).to_vec();
                SwotQuadrant {
                    category,
                    title: meta.title,
                    accent: meta.accent,
                    placeholder: items.is_empty().then_some(NO_SWOT_ITEMS),
                    items,
                }
            })
            .collect();

        let recommendations = SwotCategory::ALL
            .iter()
            .filter_map(|&category| {
                let text = result.recommendations.get(category).trim();
                if text.is_empty() {
                    return None;
                }
                let meta = category.meta();
                Some(RecommendationCard {
                    category,
                    title: meta.recommendation_title,
                    accent: meta.accent,
                    text: text.to_string(),
                })
            })
            .collect();

        Self {
            result,
            quadrants,
            recommendations,
        }
    }
}

impl SwotView {
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for quadrant in &self.quadrants {
            let _ = writeln!(out, "{}", quadrant.title);
            match quadrant.placeholder {
                Some(placeholder) => {
                    let _ = writeln!(out, "  {placeholder}");
                }
                None => {
                    for item in &quadrant.items {
                        let _ = writeln!(out, "  ▸ {item}");
                    }
                }
            }
            let _ = writeln!(out);
        }

        if !self.recommendations.is_empty() {
            let _ = writeln!(out, "Actionable Recommendations");
            for card in &self.recommendations {
                let _ = writeln!(out, "{}: {}", card.title, card.text);
            }
        }
        out
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Suitability
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SuitabilityView {
    pub result: JobSuitabilityAnalysis,
    pub band: ScoreBand,
    pub band_accent: &'static str,
    pub matching_placeholder: Option<&'static str>,
    pub missing_placeholder: Option<&'static str>,
}

impl From<JobSuitabilityAnalysis> for SuitabilityView {
    fn from(result: JobSuitabilityAnalysis) -> Self {
        let band = ScoreBand::from_score(result.suitability_score);
        Self {
            band,
            band_accent: band.accent(),
            matching_placeholder: result
                .matching_skills
                .is_empty()
                .then_some(NO_MATCHING_SKILLS),
            missing_placeholder: result.missing_skills.is_empty().then_some(NO_MISSING_SKILLS),
            result,
        }
    }
}

impl SuitabilityView {
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Suitability: {}% ({})",
            self.result.suitability_score,
            self.band.as_str()
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "Analysis Summary");
        let _ = writeln!(out, "{}", self.result.summary);
        let _ = writeln!(out);

        let sections = [
            (
                "Matching Skills",
                &self.result.matching_skills,
                self.matching_placeholder,
            ),
            (
                "Missing Skills",
                &self.result.missing_skills,
                self.missing_placeholder,
            ),
        ];
        for (title, skills, placeholder) in sections {
            let _ = writeln!(out, "{title}");
            match placeholder {
                Some(p) => {
                    let _ = writeln!(out, "  {p}");
                }
                None => {
                    let _ = writeln!(out, "  {}", skills.join(", "));
                }
            }
        }
        out
    }
}
