//! Model-output cleanup shared by synthesis and ranking.

/// Strip markdown code-fence wrapping from a model response.
///
/// Models frequently wrap JSON in ```` ```json ```` fences despite being
/// told not to; the fences are removed wherever they appear and the
/// remainder trimmed.
pub(crate) fn strip_code_fences(response: &str) -> String {
    response
        .replace("```json\n", "")
        .replace("```json", "")
        .replace("```\n", "")
        .replace("```", "")
        .trim()
        .to_string()
}
