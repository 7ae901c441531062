//! Profile Analyzer — asks the LLM for job titles and skills and parses its two-line reply.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::profile::prompts::{PROFILE_ANALYSIS_PROMPT, SKILLS_MARKER, TITLES_MARKER};
use crate::profile::Profile;

/// Only the head of the resume is submitted; anything past it is dropped.
pub const MAX_RESUME_CHARS: usize = 4000;

const DEFAULT_TITLES_LINE: &str = "TITLES: Generalist";
const DEFAULT_SKILLS_LINE: &str = "SKILLS: Python";

/// Analyzes resume text with one LLM call. No retry on failure.
pub async fn analyze_resume(
    resume_text: &str,
    api_key: &str,
    llm: &LlmClient,
) -> Result<Profile, AppError> {
    let prompt = build_prompt(resume_text);
    let reply = llm
        .call(api_key, &prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Profile analysis failed: {e}")))?;

    let profile = parse_profile_reply(&reply);
    info!(
        "Profile analysis complete: {} titles, {} skills",
        profile.titles.len(),
        profile.skills.len()
    );
    Ok(profile)
}

/// First `MAX_RESUME_CHARS` characters (not bytes) of the resume.
pub fn truncate_resume(resume_text: &str) -> &str {
    match resume_text.char_indices().nth(MAX_RESUME_CHARS) {
        Some((byte_idx, _)) => &resume_text[..byte_idx],
        None => resume_text,
    }
}

pub fn build_prompt(resume_text: &str) -> String {
    PROFILE_ANALYSIS_PROMPT.replace("{resume_text}", truncate_resume(resume_text))
}

/// Parses `TITLES: ...` / `SKILLS: ...` lines. Missing lines fall back to the
/// defaults; token order and duplicates are kept as the model returned them.
pub fn parse_profile_reply(reply: &str) -> Profile {
    let titles_line = find_marker_line(reply, TITLES_MARKER).unwrap_or(DEFAULT_TITLES_LINE);
    let skills_line = find_marker_line(reply, SKILLS_MARKER).unwrap_or(DEFAULT_SKILLS_LINE);

    Profile {
        titles: split_marker_line(titles_line, TITLES_MARKER),
        skills: split_marker_line(skills_line, SKILLS_MARKER),
    }
}

fn find_marker_line<'a>(reply: &'a str, marker: &str) -> Option<&'a str> {
    reply.split('\n').find(|line| line.contains(marker))
}

fn split_marker_line(line: &str, marker: &str) -> Vec<String> {
    line.replace(marker, "")
        .split(',')
        .map(|token| token.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_line_reply() {
        let profile = parse_profile_reply("TITLES: A, B\nSKILLS: X, Y, Z");
        assert_eq!(profile.titles, vec!["A", "B"]);
        assert_eq!(profile.skills, vec!["X", "Y", "Z"]);
    }

    #[test]
    fn test_missing_skills_defaults_to_python() {
        let profile = parse_profile_reply("TITLES: Backend Engineer, SRE");
        assert_eq!(profile.titles, vec!["Backend Engineer", "SRE"]);
        assert_eq!(profile.skills, vec!["Python"]);
    }

    #[test]
    fn test_missing_titles_defaults_to_generalist() {
        let profile = parse_profile_reply("Sure! Here you go.\nSKILLS: Rust");
        assert_eq!(profile.titles, vec!["Generalist"]);
        assert_eq!(profile.skills, vec!["Rust"]);
    }

    #[test]
    fn test_first_marker_line_wins() {
        let reply = "TITLES: First\nTITLES: Second\nSKILLS: One\nSKILLS: Two";
        let profile = parse_profile_reply(reply);
        assert_eq!(profile.titles, vec!["First"]);
        assert_eq!(profile.skills, vec!["One"]);
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let profile = parse_profile_reply("SKILLS: Go, Rust, Go\nTITLES: Z, A, Z");
        assert_eq!(profile.titles, vec!["Z", "A", "Z"]);
        assert_eq!(profile.skills, vec!["Go", "Rust", "Go"]);
    }

    #[test]
    fn test_marker_found_mid_line() {
        let profile = parse_profile_reply("Here it is -> TITLES: Data Engineer\r\nSKILLS: SQL ,  dbt ");
        assert_eq!(profile.titles, vec!["Here it is ->  Data Engineer"]);
        assert_eq!(profile.skills, vec!["SQL", "dbt"]);
    }

    #[test]
    fn test_short_resume_is_submitted_unmodified() {
        let resume = "Jane Doe\nRust, Kubernetes\n10 years of backend work";
        assert_eq!(truncate_resume(resume), resume);
        assert!(build_prompt(resume).contains(resume));
    }

    #[test]
    fn test_exactly_limit_is_unmodified() {
        let resume = "a".repeat(MAX_RESUME_CHARS);
        assert_eq!(truncate_resume(&resume), resume);
    }

    #[test]
    fn test_long_resume_truncated_to_limit() {
        let head = "x".repeat(MAX_RESUME_CHARS);
        let resume = format!("{head}TAIL-MARKER-THAT-MUST-NOT-APPEAR");
        let prompt = build_prompt(&resume);

        assert_eq!(truncate_resume(&resume), head);
        assert!(prompt.contains(&head));
        assert!(!prompt.contains("TAIL-MARKER"));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let resume = "é".repeat(MAX_RESUME_CHARS + 10);
        let truncated = truncate_resume(&resume);
        assert_eq!(truncated.chars().count(), MAX_RESUME_CHARS);
    }

    #[test]
    fn test_prompt_mandates_reply_format() {
        let prompt = build_prompt("resume");
        assert!(prompt.contains("TITLES: Title 1, Title 2, Title 3"));
        assert!(prompt.contains("SKILLS: Skill 1, Skill 2, Skill 3"));
        assert!(prompt.contains("3-5"));
    }
}
