// Job-link search: ATS query generation, web search, link validation and harvesting.

pub mod handlers;
pub mod harvester;
pub mod links;
pub mod provider;
pub mod queries;
