// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Profile schema shared by every prompt that asks the model for a candidate profile.
pub const PROFILE_SCHEMA: &str = r#"{
  "name": "Full name",
  "email": "Email address",
  "phone": "Phone number",
  "summary": "Professional summary or objective",
  "title": "Current or desired job title",
  "experience_years": 0,
  "skills": ["skill1", "skill2"],
  "technical_stack": ["technology1", "technology2"],
  "languages": ["English", "Indonesian"],
  "preferred_roles": ["Backend Developer", "Software Engineer"],
  "preferred_locations": ["Jakarta", "Remote"],
  "preferred_remote_modes": ["WFH", "Hybrid"],
  "preferred_job_types": ["full_time"],
  "education": [
    {"degree": "Bachelor", "field": "Computer Science", "institution": "University Name", "year": 2020}
  ],
  "work_history": [
    {
      "title": "Software Engineer",
      "company": "Company Name",
      "location": "Jakarta",
      "start_date": "2020-01",
      "end_date": "2023-12",
      "description": "Brief description",
      "skills": ["Go", "Python"]
    }
  ],
  "certifications": ["AWS Certified"],
  "achievements": ["Led team of 5"]
}"#;
