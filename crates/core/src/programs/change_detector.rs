use std::collections::HashSet;

use super::ProgramRecord;

/// Returns the records of `current` whose `id` does not appear in `previous`.
///
/// Order follows `current`. Duplicate ids in `current` are classified one by
/// one and are not collapsed here.
pub fn detect_new_programs(
    current: &[ProgramRecord],
    previous: &[ProgramRecord],
) -> Vec<ProgramRecord> {
    let seen: HashSet<&str> = previous.iter().map(|p| p.id.as_str()).collect();
    current
        .iter()
        .filter(|p| !seen.contains(p.id.as_str()))
        .cloned()
        .collect()
}
