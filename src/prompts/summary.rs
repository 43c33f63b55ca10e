const INTRO: &str = "You are a concise summarization assistant.";
const INSTRUCTION: &str = "Summarize the following text in 3-6 sentences:";

/// Render the summary prompt. `text` is embedded verbatim.
pub fn build_summary_prompt(text: &str) -> String {
    format!("{INTRO} {INSTRUCTION}\n\n{text}\n")
}
