// Profile Analyzer LLM prompt template.
// The reply format is parsed line-by-line in analyzer.rs; keep the markers in sync.

pub const TITLES_MARKER: &str = "TITLES:";
pub const SKILLS_MARKER: &str = "SKILLS:";

pub const PROFILE_ANALYSIS_PROMPT: &str = r#"You are an expert career coach. Analyze the following resume text.
Identify the top 3-5 relevant job titles this candidate is qualified for.
Also, identify their top 5 core technical skills.

Return the response strictly in this format:
TITLES: Title 1, Title 2, Title 3
SKILLS: Skill 1, Skill 2, Skill 3

Resume Text:
{resume_text}
"#;
