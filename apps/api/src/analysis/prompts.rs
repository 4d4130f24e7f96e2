// All prompt templates for the analysis kinds.
// Placeholders are `{name}` and are filled in a single pass by
// `request::fill_template`, so user text is embedded verbatim.

/// Headline prompt without a job description. Replace `{headline}`.
pub const HEADLINE_PROMPT_TEMPLATE: &str = "Analyze the following LinkedIn headline: \"{headline}\". \
Evaluate its clarity, conciseness, professional tone, and use of relevant keywords. \
Provide an overall quality assessment ('Strong', 'Medium', 'Weak'), a brief summary of your analysis, \
and suggest 3 improved versions. \
Return an empty missingSkills array.";

/// Headline prompt tailored to a job description.
/// Replace `{headline}` and `{job_description}`.
pub const HEADLINE_WITH_JD_PROMPT_TEMPLATE: &str = "Analyze the following LinkedIn headline: \"{headline}\". \
Evaluate its clarity, conciseness, professional tone, and use of relevant keywords, \
specifically in the context of this job description: \"{job_description}\". \
Provide an overall quality assessment ('Strong', 'Medium', 'Weak'), \
a brief analysis of how well the headline aligns with the job description, \
identify 2-3 critical keywords or skills from the job description that are missing from the current headline, \
and suggest 3 improved versions that are highly tailored to the provided job description \
and incorporate some of the missing skills.";

/// Personal SWOT prompt. Replace `{user_info}`.
pub const SWOT_PROMPT_TEMPLATE: &str = "Based on the following user-provided skills, goals, and personal traits, \
generate a personal SWOT analysis. \
Categorize each point into Strengths, Weaknesses, Opportunities, or Threats. \
For each of the four SWOT categories, also provide one actionable recommendation. \
User input: \"{user_info}\"";

/// Resume vs job description prompt. Replace `{resume_text}` and `{job_description}`.
pub const SUITABILITY_PROMPT_TEMPLATE: &str = r#"Analyze the provided resume text against the job description.
- Resume: "{resume_text}"
- Job Description: "{job_description}"

Determine a job suitability score from 0 to 100 representing how well the resume matches the job requirements. Provide a brief summary of the candidate's fit for the role. Identify a list of key skills from the job description that are present in the resume, and a separate list of key skills from the job description that are missing from the resume."#;
