//! Applying style fragments to a prompt

/// Token replaced by the user prompt when present in a fragment
pub const PLACEHOLDER: &str = "{prompt}";

/// Merge one style fragment into a prompt.
///
/// A fragment containing `{prompt}` is a template: every occurrence is
/// replaced with `prompt` verbatim. Any other fragment is appended after the
/// prompt with `", "`, both sides trimmed and empty sides dropped.
pub fn merge_prompts(style_fragment: &str, prompt: &str) -> String {
    if style_fragment.contains(PLACEHOLDER) {
        return style_fragment.replace(PLACEHOLDER, prompt);
    }

    [prompt.trim(), style_fragment.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fold `merge_prompts` over fragments in order, threading the prompt through.
pub fn apply_styles_to_prompt<S: AsRef<str>>(prompt: &str, fragments: &[S]) -> String {
    fragments
        .iter()
        .fold(prompt.to_string(), |acc, fragment| merge_prompts(fragment.as_ref(), &acc))
}
