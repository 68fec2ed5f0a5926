//! File name classifier - business capability layer
//!
//! Maps a file name to a [`FileGroup`]. Pure; no I/O.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::FileGroup;

static JUSTIFICATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([об]*[гґ]рунтування|obgr)").expect("justification pattern is valid")
});

static CONTRACT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(договор|договір|dogovir|dogovor|проєкт|проект|proekt)")
        .expect("contract pattern is valid")
});

/// Classify a file name.
///
/// The justification pattern is tested first, so a name matching both
/// patterns is a justification.
pub fn categorize(file_name: &str) -> FileGroup {
    if JUSTIFICATION_PATTERN.is_match(file_name) {
        FileGroup::Justification
    } else if CONTRACT_PATTERN.is_match(file_name) {
        FileGroup::Contract
    } else {
        FileGroup::Additional
    }
}

pub fn check_type(file_name: &str, group: FileGroup) -> bool {
    categorize(file_name) == group
}

/// True if at least one name classifies as `group`
pub fn find_type<S: AsRef<str>>(file_names: &[S], group: FileGroup) -> bool {
    file_names.iter().any(|name| check_type(name.as_ref(), group))
}
