//! Query Generator — one ATS-restricted search query per job title.

/// Applicant-tracking-system domains the search is restricted to.
pub const ATS_DOMAINS: [&str; 4] = [
    "lever.co",
    "greenhouse.io",
    "myworkdayjobs.com",
    "smartrecruiters.com",
];

const EXCLUSION_TERMS: &str = "-intitle:archive -intitle:closed";
const REMOTE_CLAUSE: &str = "\"remote\"";

fn site_clause() -> String {
    ATS_DOMAINS
        .iter()
        .map(|domain| format!("site:{domain}"))
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Builds the queries in title order, so `queries[i]` always belongs to `titles[i]`.
///
/// Double quotes inside a title would break the phrase quoting, so they are removed.
pub fn generate_search_queries(titles: &[String], remote_only: bool) -> Vec<String> {
    let base_query = site_clause();
    let location = if remote_only { REMOTE_CLAUSE } else { "" };

    titles
        .iter()
        .map(|title| {
            let title = title.replace('"', "");
            format!("{base_query} \"{title}\" {location} {EXCLUSION_TERMS}")
        })
        .collect()
}
