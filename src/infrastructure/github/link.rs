//! Link relation accessor.
//!
//! GitHub advertises pagination through the `Link` response header:
//! `<https://api.github.com/organizations/123/repos?page=2>; rel="next", <...&page=3>; rel="last"`.
//! The fetch loop only asks for a relation by name; the header encoding
//! stays in this module.

use reqwest::header::{HeaderMap, LINK};

/// Relation name of the following page.
pub const NEXT: &str = "next";

/// Returns the URL of relation `rel` from the response headers, if any.
pub fn relation_url(headers: &HeaderMap, rel: &str) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| find_relation(value, rel))
}

/// Parse a `Link` header value into `(rel, url)` pairs, in header order.
///
/// A link declaring several space-separated relations yields one pair per
/// relation. Segments without a `<url>` or a `rel` parameter are skipped.
pub fn parse_link_header(value: &str) -> Vec<(String, String)> {
    let mut links = Vec::new();

    for part in value.split(',') {
        let mut url = None;
        let mut rels = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some((key, val)) = segment.split_once('=') {
                if key.trim().eq_ignore_ascii_case("rel") {
                    rels = Some(val.trim().trim_matches('"'));
                }
            }
        }

        if let (Some(url), Some(rels)) = (url, rels) {
            for rel in rels.split_whitespace() {
                links.push((rel.to_string(), url.to_string()));
            }
        }
    }

    links
}

fn find_relation(value: &str, rel: &str) -> Option<String> {
    parse_link_header(value)
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(rel))
        .map(|(_, url)| url)
}
