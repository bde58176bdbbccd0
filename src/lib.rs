pub mod handlers;
pub mod index;
pub mod menu;
pub mod report;
pub mod tokenize;

pub use handlers::{router, AppState};
pub use index::{
    max_words, CorpusStats, FrequencyIndex, IndexError, LineMatches, LineOccurrenceIndex,
    MostRepeated, QueryError, TextIndex,
};
pub use tokenize::{line_tokens, normalize, tokens};
