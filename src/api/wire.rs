//! Lenient decoding of backend JSON.
//!
//! Unexpected shapes never fail: a missing or ill-typed field is treated as
//! absent/empty, and list items that cannot be understood are skipped.

use crate::model::{Document, PageMetadata, ProblemTag, ResultPage, SuggestionSet};
use serde::Serialize;
use serde_json::Value;

/// `{categories: [string]}` as returned by autocomplete and suggest
pub fn categories(json: &Value) -> Vec<String> {
    json["categories"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn suggestion_set(json: &Value) -> SuggestionSet {
    SuggestionSet {
        topics: categories(json),
    }
}

/// `{articles: [{page, problems: [tag]}], more: bool}`
pub fn result_page(json: &Value) -> ResultPage {
    let mut documents = Vec::new();
    let mut skipped = 0;
    if let Some(articles) = json["articles"].as_array() {
        for article in articles {
            let Some(page) = article["page"].as_str().filter(|p| !p.is_empty()) else {
                tracing::debug!(article = %article, "skipping article without page id");
                skipped += 1;
                continue;
            };

            let problems = article["problems"]
                .as_array()
                .map(|tags| {
                    tags.iter()
                        .filter_map(Value::as_str)
                        .filter_map(|raw| {
                            let tag = ProblemTag::from_wire(raw);
                            if tag.is_none() {
                                tracing::debug!(tag = %raw, page = %page, "dropping unknown problem tag");
                            }
                            tag
                        })
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();

            documents.push(Document::new(page, problems));
        }
    }

    ResultPage {
        documents,
        has_more: json["more"].as_bool().unwrap_or(false),
        skipped,
    }
}

/// `{displaytitle, description}` from the public metadata service
pub fn page_metadata(json: &Value) -> PageMetadata {
    PageMetadata {
        title: json["displaytitle"]
            .as_str()
            .or_else(|| json["title"].as_str())
            .unwrap_or("")
            .to_string(),
        description: json["description"].as_str().unwrap_or("").to_string(),
    }
}

/// Body of an activity report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityBody<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub title: &'a str,
    pub weblink: &'a str,
}
