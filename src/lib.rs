// Library API: the query engine plus the loaders the CLI uses
pub mod anagram;
pub mod deadline;
pub mod dispatch;
pub mod equation;
pub mod errors;
pub mod log;
pub mod matcher;
pub mod pattern;
pub mod wf_char;
pub mod word_index;

pub use dispatch::{execute_query, MatchResult, QueryOutput, ResultKind};
pub use word_index::WordIndex;
