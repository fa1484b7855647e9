//! Fixed prompt templates and generation parameters.
//!
//! Two request kinds share the endpoint:
//! * **Correction** — the grammar/readability instruction followed by the
//!   user's text; low temperature, no output cap.
//! * **Probe** — asks the model to answer with a sentinel word; used to check
//!   a candidate API key with a short, cheap request.

use super::wire::GenerationConfig;

/// Instruction prefixed to every correction request.
const CORRECTION_INSTRUCTION: &str = "\
You are a grammar and readability correction tool. \
Fix grammar and improve readability of this text without changing meaning. \
Respond ONLY with the corrected text, no explanations:";

/// Text sent by the credential probe.
pub const PROBE_PROMPT: &str =
    "Hello, please respond with just the word 'valid' if you can read this message.";

/// Substring expected (case-insensitively) in the probe's reply.
pub const PROBE_SENTINEL: &str = "valid";

/// Sampling parameters for a correction.
pub const CORRECTION_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 0.1,
    top_p: Some(0.8),
    top_k: Some(40),
    max_output_tokens: None,
};

/// Sampling parameters for the probe.
pub const PROBE_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 0.1,
    top_p: None,
    top_k: None,
    max_output_tokens: Some(10),
};

/// Build the correction prompt for `text`.
///
/// ```
/// use write_right::llm::prompt::correction_prompt;
///
/// let prompt = correction_prompt("i has a error");
/// assert!(prompt.ends_with("\n\ni has a error"));
/// ```
pub fn correction_prompt(text: &str) -> String {
    format!("{CORRECTION_INSTRUCTION}\n\n{text}")
}

/// `true` when a probe reply contains the sentinel, ignoring case.
pub fn is_probe_reply(reply: &str) -> bool {
    reply.to_lowercase().contains(PROBE_SENTINEL)
}
