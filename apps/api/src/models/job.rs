//! Job postings, their normalized enums, and ranked results.
//!
//! `WorkType` and `SiteSetting` normalize on deserialization, so every posting
//! that enters the pipeline already carries canonical values.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{nullable, string_or_list};

/// Employment type. Unrecognized values pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum WorkType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Freelance,
    #[default]
    Unspecified,
    Other(String),
}

impl WorkType {
    pub fn normalize(raw: &str) -> Self {
        match canonical_key(raw).as_str() {
            "" => WorkType::Unspecified,
            "full_time" | "fulltime" | "permanent" => WorkType::FullTime,
            "part_time" | "parttime" => WorkType::PartTime,
            "contract" | "contractor" | "contractual" | "temporary" => WorkType::Contract,
            "internship" | "intern" => WorkType::Internship,
            "freelance" | "freelancer" => WorkType::Freelance,
            _ => WorkType::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WorkType::FullTime => "full_time",
            WorkType::PartTime => "part_time",
            WorkType::Contract => "contract",
            WorkType::Internship => "internship",
            WorkType::Freelance => "freelance",
            WorkType::Unspecified => "",
            WorkType::Other(raw) => raw,
        }
    }
}

impl From<Option<String>> for WorkType {
    fn from(raw: Option<String>) -> Self {
        raw.map(|r| WorkType::normalize(&r)).unwrap_or_default()
    }
}

impl From<WorkType> for String {
    fn from(value: WorkType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the work happens. Anything unrecognized is `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum SiteSetting {
    Wfh,
    Wfo,
    Hybrid,
    #[default]
    Unknown,
}

impl SiteSetting {
    pub fn normalize(raw: &str) -> Self {
        match canonical_key(raw).as_str() {
            "wfh" | "remote" | "work_from_home" | "fully_remote" | "remote_only" => {
                SiteSetting::Wfh
            }
            "wfo" | "onsite" | "on_site" | "office" | "work_from_office" | "in_office" => {
                SiteSetting::Wfo
            }
            "hybrid" | "flexible" => SiteSetting::Hybrid,
            _ => SiteSetting::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SiteSetting::Wfh => "WFH",
            SiteSetting::Wfo => "WFO",
            SiteSetting::Hybrid => "Hybrid",
            SiteSetting::Unknown => "Unknown",
        }
    }
}

impl From<Option<String>> for SiteSetting {
    fn from(raw: Option<String>) -> Self {
        raw.map(|r| SiteSetting::normalize(&r)).unwrap_or_default()
    }
}

impl From<SiteSetting> for String {
    fn from(value: SiteSetting) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SiteSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercases and folds spaces/hyphens to underscores: "Full-Time" → "full_time".
fn canonical_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// A single job opportunity extracted from a web page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub company: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub location: String,
    #[serde(default)]
    pub work_type: WorkType,
    #[serde(default)]
    pub site_setting: SiteSetting,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    /// web, linkedin, ...
    #[serde(default, deserialize_with = "nullable")]
    pub source: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub salary: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub date_posted: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub application_url: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub requirements: String,
    #[serde(default, deserialize_with = "string_or_list", skip_serializing_if = "Vec::is_empty")]
    pub benefits: Vec<String>,
    /// entry, mid, senior, lead
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub experience_level: String,
}

/// A posting annotated with its match score (0–100) and a short justification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedJob {
    #[serde(flatten)]
    pub job: JobPosting,
    pub match_score: u8,
    pub match_reason: String,
}
