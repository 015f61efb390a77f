/// Bank key that also matches its common abbreviated spellings.
const COMPONENT_FRAMEWORK: &str = "react";
const COMPONENT_FRAMEWORK_ALIASES: [&str; 2] = ["react.js", "reactjs"];

/// Returns the bank languages mentioned in `text`, in bank order.
///
/// Matching is plain case-insensitive substring containment with no word
/// boundaries, so "Java" is also reported for text that only says "JavaScript".
pub fn detect<S: AsRef<str>>(text: &str, languages: &[S]) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();

    for lang in languages {
        let lang = lang.as_ref();
        let key = lang.to_lowercase();
        let mut matched = lower.contains(&key);
        if key == COMPONENT_FRAMEWORK {
            matched |= COMPONENT_FRAMEWORK_ALIASES
                .iter()
                .any(|alias| lower.contains(alias));
        }
        if matched && !found.iter().any(|f| f == lang) {
            found.push(lang.to_string());
        }
    }

    found
}
