use crate::labels;
use crate::model::SuggestionSet;

/// Suggested topics rendered as one sentence of clickable badges:
/// intro phrase, topics separated by commas, "oder" before the last one,
/// terminal question mark.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionSentence {
    topics: Vec<String>,
}

impl SuggestionSentence {
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Topic behind badge `index`
    pub fn badge(&self, index: usize) -> Option<&str> {
        self.topics.get(index).map(String::as_str)
    }

    /// Sentence split into plain text and badge parts, in reading order
    pub fn parts(&self) -> Vec<SentencePart<'_>> {
        let mut parts = Vec::new();
        let Some((last, rest)) = self.topics.split_last() else {
            return parts;
        };

        parts.push(SentencePart::Text(format!("{} ", labels::SUGGEST_INTRO)));
        for (index, topic) in rest.iter().enumerate() {
            parts.push(SentencePart::Badge { index, topic });
            if index + 1 < rest.len() {
                parts.push(SentencePart::Text(", ".to_string()));
            }
        }
        if !rest.is_empty() {
            parts.push(SentencePart::Text(format!(" {} ", labels::SUGGEST_OR)));
        }
        parts.push(SentencePart::Badge {
            index: rest.len(),
            topic: last,
        });
        parts.push(SentencePart::Text("?".to_string()));
        parts
    }

    /// Plain-text form of the sentence; empty when there are no topics
    pub fn text(&self) -> String {
        self.parts()
            .into_iter()
            .map(|part| match part {
                SentencePart::Text(text) => text,
                SentencePart::Badge { topic, .. } => topic.to_string(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentencePart<'a> {
    Text(String),
    Badge { index: usize, topic: &'a str },
}

/// Owns the currently shown suggestion sentence
#[derive(Debug, Default)]
pub struct SuggestionService {
    current: Option<SuggestionSentence>,
}

impl SuggestionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, suggestions: &SuggestionSet) -> &SuggestionSentence {
        self.current.insert(SuggestionSentence {
            topics: suggestions.topics.clone(),
        })
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&SuggestionSentence> {
        self.current.as_ref()
    }
}
