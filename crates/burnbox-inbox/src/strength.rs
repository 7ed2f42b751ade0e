//! Password strength scoring.

use std::collections::HashSet;

use burnbox_storage::Strength;

/// Score a password into a coarse strength tier.
///
/// Additive over seven independent signals: length >= 12, length >= 14,
/// contains uppercase, contains lowercase, contains a digit, contains a
/// non-word character, and high character diversity (distinct characters
/// within 2 of the length). Score <= 3 is weak, 4-5 medium, >= 6 strong.
/// Deterministic for a fixed input.
pub fn evaluate_strength(password: &str) -> Strength {
    let length = password.chars().count();
    let mut score = 0u32;

    if length >= 12 {
        score += 1;
    }
    if length >= 14 {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric() && c != '_') {
        score += 1;
    }

    // Permits at most two repeated characters regardless of length; kept as
    // the original scoring behavior.
    let distinct: HashSet<char> = password.chars().collect();
    if distinct.len() + 2 >= length {
        score += 1;
    }

    match score {
        0..=3 => Strength::Weak,
        4..=5 => Strength::Medium,
        _ => Strength::Strong,
    }
}
