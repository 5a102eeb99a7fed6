//! Candidate profile and the explicit search filter layered on top of it.

use serde::{Deserialize, Serialize};

use super::nullable;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub degree: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub field: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub institution: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub company: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub start_date: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub end_date: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}

/// Structured candidate attributes used to drive search and scoring.
///
/// Only changed through [`CandidateProfile::merge_filter`] and
/// [`CandidateProfile::absorb`]; neither lets an empty value clobber a populated one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub phone: String,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub experience_years: f64,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub technical_stack: Vec<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub preferred_roles: Vec<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub preferred_locations: Vec<String>,
    /// WFH, WFO, Hybrid
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub preferred_remote_modes: Vec<String>,
    /// full_time, contract, ...
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub preferred_job_types: Vec<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub min_salary: Option<u64>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub max_salary: Option<u64>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub currency: String,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub work_history: Vec<WorkExperience>,

    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub certifications: Vec<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub achievements: Vec<String>,
}

/// Caller-supplied search constraints. Non-empty fields override the profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    #[serde(default, deserialize_with = "nullable")]
    pub locations: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub remote_modes: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub job_types: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub min_salary: Option<u64>,
    #[serde(default, deserialize_with = "nullable")]
    pub max_salary: Option<u64>,
    #[serde(default, deserialize_with = "nullable")]
    pub currency: String,
    /// last_24h, last_week, last_month
    #[serde(default, deserialize_with = "nullable")]
    pub date_posted: String,
}

impl SearchFilter {
    /// Provider date restriction for the date-posted bucket, if any.
    pub fn date_restrict(&self) -> Option<&'static str> {
        match self.date_posted.trim().to_ascii_lowercase().as_str() {
            "last_24h" | "24h" | "today" => Some("d1"),
            "last_week" | "week" => Some("w1"),
            "last_month" | "month" => Some("m1"),
            _ => None,
        }
    }
}

impl CandidateProfile {
    /// Applies the filter on top of the profile, field by field.
    pub fn merge_filter(&mut self, filter: &SearchFilter) {
        override_list(&mut self.preferred_locations, &filter.locations);
        override_list(&mut self.preferred_remote_modes, &filter.remote_modes);
        override_list(&mut self.preferred_job_types, &filter.job_types);
        if let Some(min) = filter.min_salary.filter(|v| *v > 0) {
            self.min_salary = Some(min);
        }
        if let Some(max) = filter.max_salary.filter(|v| *v > 0) {
            self.max_salary = Some(max);
        }
        override_string(&mut self.currency, &filter.currency);
    }

    /// Folds a refined copy of this profile back in.
    ///
    /// Scalars, preference lists and history override only when the refined
    /// value is non-empty. Skill-like lists are unioned, existing entries first.
    pub fn absorb(&mut self, refined: CandidateProfile) {
        override_string(&mut self.name, &refined.name);
        override_string(&mut self.email, &refined.email);
        override_string(&mut self.phone, &refined.phone);
        override_string(&mut self.summary, &refined.summary);
        override_string(&mut self.title, &refined.title);
        if refined.experience_years > 0.0 {
            self.experience_years = refined.experience_years;
        }

        union_into(&mut self.skills, refined.skills);
        union_into(&mut self.technical_stack, refined.technical_stack);
        union_into(&mut self.languages, refined.languages);
        union_into(&mut self.certifications, refined.certifications);
        union_into(&mut self.achievements, refined.achievements);

        override_list(&mut self.preferred_roles, &refined.preferred_roles);
        override_list(&mut self.preferred_locations, &refined.preferred_locations);
        override_list(
            &mut self.preferred_remote_modes,
            &refined.preferred_remote_modes,
        );
        override_list(&mut self.preferred_job_types, &refined.preferred_job_types);
        if refined.min_salary.is_some_and(|v| v > 0) {
            self.min_salary = refined.min_salary;
        }
        if refined.max_salary.is_some_and(|v| v > 0) {
            self.max_salary = refined.max_salary;
        }
        override_string(&mut self.currency, &refined.currency);

        if !refined.education.is_empty() {
            self.education = refined.education;
        }
        if !refined.work_history.is_empty() {
            self.work_history = refined.work_history;
        }
    }
}

fn override_string(target: &mut String, value: &str) {
    if !value.trim().is_empty() {
        *target = value.to_string();
    }
}

fn override_list(target: &mut Vec<String>, values: &[String]) {
    let values: Vec<String> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    if !values.is_empty() {
        *target = values;
    }
}

fn union_into(target: &mut Vec<String>, values: Vec<String>) {
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !target.iter().any(|t| t.eq_ignore_ascii_case(trimmed)) {
            target.push(trimmed.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_profile_deserializes_nulls_as_empty() {
        let json = r#"{
            "name": null,
            "title": "Backend Engineer",
            "experience_years": 3.5,
            "skills": ["Go", "Rust"],
            "preferred_locations": null,
            "education": [{"degree": "Bachelor", "year": null}],
            "min_salary": null
        }"#;
        let profile: CandidateProfile = serde_json::from_str(json).unwrap();
        assert!(profile.name.is_empty());
        assert_eq!(profile.title, "Backend Engineer");
        assert!((profile.experience_years - 3.5).abs() < f64::EPSILON);
        assert_eq!(profile.skills, strings(&["Go", "Rust"]));
        assert!(profile.preferred_locations.is_empty());
        assert_eq!(profile.education[0].year, None);
        assert_eq!(profile.min_salary, None);
    }

    #[test]
    fn test_empty_profile_serializes_compactly() {
        let json = serde_json::to_value(CandidateProfile::default()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("experience_years"));
    }

    #[test]
    fn test_filter_overrides_non_empty_fields_only() {
        let mut profile = CandidateProfile {
            preferred_locations: strings(&["Bandung"]),
            preferred_remote_modes: strings(&["WFO"]),
            preferred_job_types: strings(&["contract"]),
            min_salary: Some(10_000_000),
            currency: "IDR".to_string(),
            ..Default::default()
        };
        let filter = SearchFilter {
            locations: strings(&["Jakarta"]),
            remote_modes: vec![],
            min_salary: Some(0),
            max_salary: Some(30_000_000),
            currency: "  ".to_string(),
            ..Default::default()
        };

        profile.merge_filter(&filter);

        assert_eq!(profile.preferred_locations, strings(&["Jakarta"]));
        assert_eq!(profile.preferred_remote_modes, strings(&["WFO"]));
        assert_eq!(profile.preferred_job_types, strings(&["contract"]));
        assert_eq!(profile.min_salary, Some(10_000_000));
        assert_eq!(profile.max_salary, Some(30_000_000));
        assert_eq!(profile.currency, "IDR");
    }

    #[test]
    fn test_filter_blank_entries_do_not_override() {
        let mut profile = CandidateProfile {
            preferred_locations: strings(&["Surabaya"]),
            ..Default::default()
        };
        profile.merge_filter(&SearchFilter {
            locations: strings(&["", "  "]),
            ..Default::default()
        });
        assert_eq!(profile.preferred_locations, strings(&["Surabaya"]));
    }

    #[test]
    fn test_absorb_unions_skills_and_overrides_preferences() {
        let mut profile = CandidateProfile {
            name: "Dewi".to_string(),
            title: "Backend Engineer".to_string(),
            experience_years: 4.0,
            skills: strings(&["Go", "PostgreSQL"]),
            preferred_locations: strings(&["Bandung"]),
            ..Default::default()
        };
        let refined = CandidateProfile {
            name: String::new(),
            title: "Senior Backend Engineer".to_string(),
            experience_years: 0.0,
            skills: strings(&["go", "Kubernetes"]),
            preferred_locations: strings(&["Jakarta"]),
            ..Default::default()
        };

        profile.absorb(refined);

        assert_eq!(profile.name, "Dewi");
        assert_eq!(profile.title, "Senior Backend Engineer");
        assert!((profile.experience_years - 4.0).abs() < f64::EPSILON);
        assert_eq!(profile.skills, strings(&["Go", "PostgreSQL", "Kubernetes"]));
        assert_eq!(profile.preferred_locations, strings(&["Jakarta"]));
    }

    #[test]
    fn test_absorb_empty_refinement_is_noop() {
        let original = CandidateProfile {
            title: "Data Engineer".to_string(),
            skills: strings(&["Python"]),
            work_history: vec![WorkExperience {
                company: "Acme".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let mut profile = original.clone();
        profile.absorb(CandidateProfile::default());
        assert_eq!(profile, original);
    }

    #[test]
    fn test_date_restrict_buckets() {
        let mut filter = SearchFilter::default();
        assert_eq!(filter.date_restrict(), None);
        filter.date_posted = "last_24h".to_string();
        assert_eq!(filter.date_restrict(), Some("d1"));
        filter.date_posted = "LAST_WEEK".to_string();
        assert_eq!(filter.date_restrict(), Some("w1"));
        filter.date_posted = "last_month".to_string();
        assert_eq!(filter.date_restrict(), Some("m1"));
        filter.date_posted = "last_decade".to_string();
        assert_eq!(filter.date_restrict(), None);
    }
}
