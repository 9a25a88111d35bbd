use gaia_core::types::Trigger;

/// Find the first enabled trigger with a keyword contained in `message`.
///
/// Matching is a case-insensitive substring test against the trimmed message.
/// Triggers are tried in the given order and the first hit wins; there is no
/// scoring or longest-match preference. Keywords are lowercased but otherwise
/// kept as stored, so surrounding spaces are part of the keyword. An empty
/// keyword never matches.
pub fn find_trigger<'a>(message: &str, triggers: &'a [Trigger]) -> Option<&'a Trigger> {
    let normalized = message.trim().to_lowercase();

    triggers
        .iter()
        .filter(|trigger| trigger.is_enabled)
        .find(|trigger| {
            trigger.keywords.iter().any(|keyword| {
                let keyword = keyword.to_lowercase();
                !keyword.is_empty() && normalized.contains(&keyword)
            })
        })
}
