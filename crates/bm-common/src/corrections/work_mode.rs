use crate::WorkMode;

/// Maps free-form work arrangement labels onto [`WorkMode`].
///
/// Hybrid wording is checked first: "remote 2 days, office 3 days" is hybrid, not remote.
pub fn correct_work_mode(input: &str) -> Option<WorkMode> {
    let lower = input.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    if lower.contains("hybrid") || lower.contains("flexible") || lower.contains("partly remote") {
        return Some(WorkMode::Hybrid);
    }

    let mentions_remote = lower.contains("remote") || lower.contains("home") || lower.contains("wfh");
    let mentions_office = lower.contains("onsite")
        || lower.contains("on-site")
        || lower.contains("on site")
        || lower.contains("office")
        || lower.contains("in person")
        || lower.contains("in-person");

    match (mentions_remote, mentions_office) {
        (true, true) => Some(WorkMode::Hybrid),
        (true, false) => Some(WorkMode::Remote),
        (false, true) => Some(WorkMode::Onsite),
        (false, false) => None,
    }
}
