// Shared prompt fragments.
// Each pipeline that calls the LLM keeps its own prompts.rs alongside it;
// this file only holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to prompts that must never invent facts about the candidate.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    Only use facts present in the provided data. \
    If a field cannot be determined, use null or an empty list instead of guessing.";

/// Renders a serializable value as pretty JSON for embedding in a prompt.
pub fn as_prompt_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
