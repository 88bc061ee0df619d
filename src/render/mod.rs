pub mod results;
pub mod suggestions;

pub use results::{
    MetadataLookup, MetadataState, Notice, ProblemBadge, ResultEntry, ResultRenderer, SlotId,
};
pub use suggestions::{SentencePart, SuggestionSentence, SuggestionService};
