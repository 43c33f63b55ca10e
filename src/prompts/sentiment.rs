const INTRO: &str =
    "Analyze the sentiment of the following text and return JSON with exactly these keys:";
const KEYS: &[(&str, &str)] = &[
    ("sentiment", "one of Positive, Neutral, Negative"),
    ("confidence", "a number between 0 and 1"),
    ("explanation", "one sentence explanation"),
];
const RULES: &[&str] = &[
    "Output the JSON object only. No markdown, no extra text, no extra keys.",
];

/// Render the sentiment prompt. `text` is embedded verbatim after the
/// instructions.
pub fn build_sentiment_prompt(text: &str) -> String {
    let keys = KEYS
        .iter()
        .map(|(key, domain)| format!("- {key}: {domain}"))
        .collect::<Vec<_>>()
        .join("\n");

    let rules = RULES
        .iter()
        .map(|rule| format!("- {rule}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{INTRO}\n{keys}\n\nRules:\n{rules}\n\nText:\n{text}\n")
}
