// Prompt constants for bullet generation.
// The caller's prompt (usually the extracted job description) is sent verbatim
// as the user message; only the system prompt is fixed here.

/// Resume-writer role. Output must be numbered bullets and nothing else.
pub const BULLET_WRITER_SYSTEM: &str = "\
    You are a professional resume writer. Your goal is to suggest resume bullet points \
    based on the job description. \
    Each bullet point should be as close to 20 to 25 words as possible, with no hashtags \
    or labels, and clearly numbered 1, 2, 3 and so on. \
    Only numbered bullets are allowed; nothing else should be in the response.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_demands_numbered_bullets_only() {
        assert!(BULLET_WRITER_SYSTEM.contains("resume writer"));
        assert!(BULLET_WRITER_SYSTEM.contains("Only numbered bullets"));
        assert!(!BULLET_WRITER_SYSTEM.contains("  "));
    }
}
