//! Llama-2 chat prompt layout.

/// Default system prompt of the Llama-2 chat models.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, respectful and honest assistant. Always answer as helpfully as possible, while being safe.  Your answers should not include any harmful, unethical, racist, sexist, toxic, dangerous, or illegal content. Please ensure that your responses are socially unbiased and positive in nature.\nIf a question does not make any sense, or is not factually coherent, explain why instead of answering something not correct. If you don't know the answer to a question, please don't share false information.";

/// Builds a Llama-2 chat prompt from `history` (user, response) pairs and a final `message`.
///
/// The first user turn is kept verbatim; every later user turn, every
/// response and (when history is non-empty) the final message are trimmed.
pub fn build_prompt(message: &str, history: &[(String, String)], system_prompt: &str) -> String {
    let mut out = format!("<s>[INST] <<SYS>>\n{system_prompt}\n<</SYS>>\n\n");

    for (i, (user, response)) in history.iter().enumerate() {
        let user = if i == 0 { user.as_str() } else { user.trim() };
        out.push_str(&format!("{user} [/INST] {} </s><s>[INST] ", response.trim()));
    }

    let message = if history.is_empty() {
        message
    } else {
        message.trim()
    };
    out.push_str(message);
    out.push_str(" [/INST]");
    out
}
