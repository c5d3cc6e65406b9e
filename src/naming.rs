//! Folder-name normalization
//!
//! Month folders on the portal are named inconsistently ("3 Marzo", "03_MARZO",
//! "3-marzo"). This module maps them onto the canonical `NN_Name` form used to
//! address the primary tree, and derives the folder names of the secondary tree.

use tracing::warn;

/// Normalize a raw month folder name into `NN_Name`
///
/// Rules, in order:
/// 1. hyphens become spaces and whitespace runs collapse to one space
/// 2. exactly two tokens `(num, name)` → `zero_pad(num) + "_" + capitalize(name)`
/// 3. otherwise, split on the first underscore the same way
/// 4. otherwise the cleaned string is returned unchanged
///
/// Only the first letter of the name is upper-cased, so multi-word names keep
/// the rest of their words in lower case.
///
/// # Examples
///
/// ```
/// use ieod_dl::naming::normalize_month;
///
/// assert_eq!(normalize_month("3 Marzo"), "03_Marzo");
/// assert_eq!(normalize_month("03_MARZO"), "03_Marzo");
/// assert_eq!(normalize_month("3-marzo"), "03_Marzo");
/// ```
#[must_use]
pub fn normalize_month(raw: &str) -> String {
    let cleaned = raw.replace('-', " ");
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();

    if let [num, name] = tokens.as_slice() {
        return format!("{}_{}", zero_pad(num), capitalize(name));
    }

    let joined = tokens.join(" ");
    if let Some((num, name)) = joined.split_once('_') {
        return format!("{}_{}", zero_pad(num), capitalize(name));
    }

    warn!(raw, "month folder name does not match a known pattern");
    joined
}

/// Month folder name in the secondary tree: `03_Marzo` → `03_MARZO`
#[must_use]
pub fn secondary_month(normalized: &str) -> String {
    match normalized.split_once('_') {
        Some((num, name)) => format!("{}_{}", num, name.to_uppercase()),
        None => normalized.to_uppercase(),
    }
}

/// Day folder name in the secondary tree: `("Día", "5")` → `Día 05`
#[must_use]
pub fn secondary_day(prefix: &str, day: &str) -> String {
    format!("{} {}", prefix, zero_pad(day))
}

/// True for non-empty strings made only of ASCII digits
pub(crate) fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// True if any character is an ASCII digit
pub(crate) fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

/// Left-pad with zeros to two characters
fn zero_pad(num: &str) -> String {
    format!("{:0>2}", num)
}

/// Upper-case the first character, lower-case the rest
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
