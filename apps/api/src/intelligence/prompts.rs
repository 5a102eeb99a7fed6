// Prompt templates for the job intelligence adapter.
// Shared fragments (JSON-only system prompt, profile schema) live in llm_client::prompts.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::llm_client::prompts::PROFILE_SCHEMA;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([a-z_]+)\}").expect("BUG: hardcoded placeholder regex is invalid")
});

/// Guidance appended to every CV parsing prompt.
const EXPERIENCE_RULES: &str = r#"IMPORTANT for experience_years:
- Calculate TOTAL years of professional experience across ALL work history entries
- Use the span from the earliest start date to the latest end date (or today if "Present")
- For example: work history covering 2022-2025 is approximately 3 years
- Do NOT just add up individual job durations

Infer preferred_roles from experience and skills.
Infer preferred_remote_modes and preferred_locations from stated preferences or recent work."#;

/// Document (PDF) CV parsing prompt. Replace `{profile_schema}`, `{experience_rules}`.
pub const PARSE_CV_DOCUMENT_TEMPLATE: &str = r#"Analyze the attached CV/resume document and extract structured information.
Return a JSON object with the following fields (use null for missing data):

{profile_schema}

{experience_rules}

Return ONLY the JSON object."#;

/// Text CV parsing prompt. Replace `{profile_schema}`, `{experience_rules}`, `{cv_text}`.
pub const PARSE_CV_TEXT_TEMPLATE: &str = r#"Analyze the following CV/resume and extract structured information.
Return a JSON object with the following fields (use null for missing data):

{profile_schema}

{experience_rules}

CV TEXT:
{cv_text}

Return ONLY the JSON object."#;

/// Profile refinement prompt. Replace `{profile_json}`, `{query}`.
pub const REFINE_PROFILE_TEMPLATE: &str = r#"Given this candidate profile and their search query, update the profile to reflect their current job search intent.

EXISTING PROFILE:
{profile_json}

SEARCH QUERY: {query}

Update the profile with any new information from the query:
- Add any skills or technologies mentioned in the query
- Update preferred_roles if the query names specific roles
- Update preferred_locations if the query mentions locations
- Update preferred_remote_modes if the query mentions remote, WFH or hybrid work
- Keep existing profile data that the query does not contradict

Return the UPDATED profile as a JSON object with the same structure as the input.
Return ONLY the JSON object."#;

/// Query-only profile derivation prompt. Replace `{query}`.
pub const DERIVE_PROFILE_TEMPLATE: &str = r#"Extract job search preferences from this search query and create a candidate profile.

SEARCH QUERY: {query}

Return a JSON object with the relevant fields:
{
  "title": "Inferred desired job title",
  "skills": ["extracted", "skills", "technologies"],
  "preferred_roles": ["inferred", "roles"],
  "preferred_locations": ["mentioned", "locations"],
  "preferred_remote_modes": ["WFH, WFO or Hybrid if mentioned"],
  "preferred_job_types": ["full_time, contract, ... if mentioned"]
}

Only include fields that can be reasonably inferred from the query.
Return ONLY the JSON object."#;

/// Job extraction prompt. Replace `{url}`, `{html}`.
pub const EXTRACT_JOB_TEMPLATE: &str = r#"Extract job posting information from this HTML content.
Return a JSON object with the following fields:

{
  "title": "Job title",
  "company": "Company name",
  "description": "Job description (summarize if very long, max 500 chars)",
  "location": "Job location",
  "work_type": "full_time|part_time|contract|internship|freelance",
  "site_setting": "WFH|WFO|Hybrid|Unknown",
  "salary": "Salary range if mentioned",
  "date_posted": "Date posted if available",
  "application_url": "Direct application link if present",
  "requirements": "Key requirements (summarize, max 300 chars)",
  "benefits": "Benefits if mentioned",
  "experience_level": "entry|mid|senior|lead",
  "tags": ["relevant", "keywords", "technologies"]
}

URL: {url}

HTML CONTENT:
{html}

Return ONLY the JSON object. If this is not a job posting page, return {"error": "not_a_job_posting"}."#;

/// Match scoring prompt. Replace `{profile_json}`, `{job_json}`.
pub const SCORE_MATCH_TEMPLATE: &str = r#"Analyze how well this job matches the candidate's profile and return a match score.

CANDIDATE PROFILE:
{profile_json}

JOB POSTING:
{job_json}

Return a JSON object with:
{
  "match_score": 0-100,
  "match_reason": "1-2 sentences explaining the match or mismatch"
}

Consider:
- Skills alignment (most important)
- Experience level match
- Location and remote preferences
- Job type preferences
- Industry or domain relevance

Return ONLY the JSON object."#;

/// Fills `{name}` slots in one pass. Substituted text is never rescanned, so
/// scraped content cannot expand a later placeholder. Unknown slots are left as is.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
        })
        .into_owned()
}

pub fn parse_cv_document_prompt() -> String {
    fill(
        PARSE_CV_DOCUMENT_TEMPLATE,
        &[
            ("profile_schema", PROFILE_SCHEMA),
            ("experience_rules", EXPERIENCE_RULES),
        ],
    )
}

pub fn parse_cv_text_prompt(cv_text: &str) -> String {
    fill(
        PARSE_CV_TEXT_TEMPLATE,
        &[
            ("profile_schema", PROFILE_SCHEMA),
            ("experience_rules", EXPERIENCE_RULES),
            ("cv_text", cv_text),
        ],
    )
}

pub fn refine_profile_prompt(profile_json: &str, query: &str) -> String {
    fill(
        REFINE_PROFILE_TEMPLATE,
        &[("profile_json", profile_json), ("query", query)],
    )
}

pub fn derive_profile_prompt(query: &str) -> String {
    fill(DERIVE_PROFILE_TEMPLATE, &[("query", query)])
}

pub fn extract_job_prompt(url: &str, html: &str) -> String {
    fill(EXTRACT_JOB_TEMPLATE, &[("url", url), ("html", html)])
}

pub fn score_match_prompt(profile_json: &str, job_json: &str) -> String {
    fill(
        SCORE_MATCH_TEMPLATE,
        &[("profile_json", profile_json), ("job_json", job_json)],
    )
}
