//! Instruction templates. User text is always embedded verbatim.

mod sentiment;
mod summary;

pub use sentiment::build_sentiment_prompt;
pub use summary::build_summary_prompt;
