//! Project-wide constants.

use std::time::Duration;

/// OpenRouter chat completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Model used when neither the config nor the caller names one.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Upper bound on a single completion call, connect through body read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default listen address for `precis serve`.
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// How much of an upstream body is kept in diagnostics and logs.
pub const MAX_DIAGNOSTIC_BODY: usize = 2048;

/// Truncate `body` to at most `max` bytes on a char boundary, noting how
/// much was dropped.
pub fn truncate_body(body: &str, max: usize) -> String {
    if body.len() <= max {
        return body.to_string();
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!(
        "{}… [truncated {} bytes]",
        &body[..end],
        body.len() - end
    )
}
