/// Atlassian-related transformations (Jira)
///
/// Pure helpers that embed converted Markdown into Jira request bodies.
pub mod jira;
