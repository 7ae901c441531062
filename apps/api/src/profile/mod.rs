// Profile analysis: resume text -> job titles and skills, cached per uploaded document.

pub mod analyzer;
pub mod cache;
pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};

/// Job titles and skills inferred from one analysis call.
/// Never merged or edited in place; a refresh replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub titles: Vec<String>,
    pub skills: Vec<String>,
}
