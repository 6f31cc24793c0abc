//! Search skill: result merging, deduplication, and text rendering.

use crate::providers::SearchDoc;
use crate::state::SearchHit;

/// Merge per-query results into one flat, ordered list. Order is query order
/// then per-query rank. URLs are deduplicated across queries: the first
/// occurrence wins, later duplicates are dropped.
pub fn merge_results(per_query: &[(String, Vec<SearchDoc>)]) -> Vec<SearchHit> {
    let mut seen_urls: Vec<String> = Vec::new();
    let mut merged = Vec::new();

    for (query, docs) in per_query {
        for doc in docs {
            if !doc.url.is_empty() {
                if seen_urls.contains(&doc.url) {
                    continue;
                }
                seen_urls.push(doc.url.clone());
            }
            merged.push(SearchHit {
                query: query.clone(),
                title: doc.title.clone(),
                snippet: doc.snippet.clone(),
                url: doc.url.clone(),
            });
        }
    }

    merged
}

/// Render one query's results as a text block for prompting.
pub fn render_results(query: &str, docs: &[SearchDoc]) -> String {
    if docs.is_empty() {
        return format!("Search Results for: '{query}'\n\nNo results found.\n");
    }

    let mut out = format!("Search Results for: '{query}'\n\n");
    for (i, doc) in docs.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, doc.title));
        out.push_str(&format!("   URL: {}\n", doc.url));
        out.push_str(&format!("   {}\n\n", doc.snippet));
    }
    out
}
