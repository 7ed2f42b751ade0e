//! Random identity fabrication.
//!
//! All draws come from the OS-seeded CSPRNG behind `rand::rng()`. Integer
//! draws reduce a 32-bit sample modulo the range size; the bias this
//! introduces is negligible for the small ranges used here and is accepted.

use rand::RngExt;
use tracing::debug;

pub(crate) const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub(crate) const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub(crate) const DIGITS: &str = "0123456789";
pub(crate) const SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:,.?";

const EMAIL_SUFFIX_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// Memorable seeds for the local part, padded to length with random
/// characters.
const PREFIX_WORDS: &[&str] = &[
    "echo", "nova", "zephyr", "lumen", "orbit", "pixel", "quartz", "raven",
    "sable", "tundra", "velvet", "willow", "ember", "falcon", "indigo",
];

pub(crate) const MAIL_DOMAINS: &[&str] = &[
    "trashmail.dev",
    "burnbox.io",
    "null-inbox.net",
    "vanish.email",
    "tempdrop.org",
    "mailfade.com",
    "throwaway.cc",
    "oneshot.email",
    "ghostmail.app",
    "smokebox.net",
    "discard.ink",
    "zeromail.top",
];

const LOCAL_PART_MIN: u32 = 8;
const LOCAL_PART_MAX: u32 = 12;
const PASSWORD_MIN: u32 = 12;
const PASSWORD_MAX: u32 = 16;

/// Regeneration attempts before constructive placement takes over. The
/// four-class miss rate per attempt is tiny at these lengths, so the cap
/// only bounds a pathological random source.
const PASSWORD_RETRY_CAP: usize = 128;

/// Uniform integer in `[min, max]` inclusive, from a 32-bit CSPRNG sample
/// reduced modulo the range size.
pub fn random_int(min: u32, max: u32) -> u32 {
    debug_assert!(min <= max);
    let span = max - min + 1;
    let sample: u32 = rand::rng().random();
    min + sample % span
}

/// Uniform draw from a non-empty character set.
pub fn random_char(alphabet: &str) -> char {
    debug_assert!(!alphabet.is_empty());
    let chars: Vec<char> = alphabet.chars().collect();
    chars[random_int(0, chars.len() as u32 - 1) as usize]
}

pub(crate) fn pick<'a>(pool: &[&'a str]) -> &'a str {
    pool[random_int(0, pool.len() as u32 - 1) as usize]
}

/// Fabricate a throwaway address: a memorable prefix word padded with random
/// lowercase letters and digits to an 8-12 character local part, at a domain
/// drawn from the fixed throwaway list.
pub fn generate_random_email() -> String {
    let target = random_int(LOCAL_PART_MIN, LOCAL_PART_MAX) as usize;
    let mut local = pick(PREFIX_WORDS).to_string();
    while local.len() < target {
        local.push(random_char(EMAIL_SUFFIX_ALPHABET));
    }
    format!("{local}@{domain}", domain = pick(MAIL_DOMAINS))
}

/// True when all four character classes (lower, upper, digit, symbol) are
/// present.
pub fn password_has_requirements(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| SYMBOLS.contains(c))
}

/// Generate a password of length 12-16 drawn from the union of all four
/// character classes, regenerating until every class is represented.
///
/// The loop terminates with probability 1; past the retry cap one guaranteed
/// character per class is placed at distinct random positions instead, so a
/// broken random source cannot spin forever.
pub fn generate_secure_password() -> String {
    let pool: String = [LOWERCASE, UPPERCASE, DIGITS, SYMBOLS].concat();

    // Full regeneration on every attempt, target length included.
    for _ in 0..PASSWORD_RETRY_CAP {
        let length = random_int(PASSWORD_MIN, PASSWORD_MAX) as usize;
        let candidate: String = (0..length).map(|_| random_char(&pool)).collect();
        if password_has_requirements(&candidate) {
            return candidate;
        }
    }

    debug!("Password regeneration cap hit, placing one character per class");
    let length = random_int(PASSWORD_MIN, PASSWORD_MAX) as usize;
    let mut chars: Vec<char> = (0..length).map(|_| random_char(&pool)).collect();
    let mut open_positions: Vec<usize> = (0..length).collect();
    for class in [LOWERCASE, UPPERCASE, DIGITS, SYMBOLS] {
        let slot = random_int(0, open_positions.len() as u32 - 1) as usize;
        let position = open_positions.swap_remove(slot);
        chars[position] = random_char(class);
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_int_stays_in_bounds() {
        for _ in 0..1_000 {
            let value = random_int(3, 7);
            assert!((3..=7).contains(&value));
        }
    }

    #[test]
    fn random_int_handles_degenerate_range() {
        assert_eq!(random_int(5, 5), 5);
    }

    #[test]
    fn random_char_draws_from_alphabet() {
        for _ in 0..200 {
            assert!(DIGITS.contains(random_char(DIGITS)));
        }
    }

    #[test]
    fn email_has_expected_shape() {
        for _ in 0..200 {
            let email = generate_random_email();
            let mut parts = email.split('@');
            let local = parts.next().unwrap();
            let domain = parts.next().unwrap();
            assert!(parts.next().is_none(), "exactly one @ expected: {email}");

            assert!((8..=12).contains(&local.len()), "bad local part: {email}");
            assert!(
                local.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
                "bad local charset: {email}"
            );
            assert!(MAIL_DOMAINS.contains(&domain), "unknown domain: {email}");
        }
    }

    #[test]
    fn passwords_always_satisfy_requirements() {
        for _ in 0..1_000 {
            let password = generate_secure_password();
            assert!((12..=16).contains(&password.len()), "bad length: {password}");
            assert!(password_has_requirements(&password), "missing class: {password}");
        }
    }

    #[test]
    fn requirements_predicate_spots_missing_classes() {
        assert!(password_has_requirements("aB3$efGh1jK!"));
        assert!(!password_has_requirements("alllowercase1$"));
        assert!(!password_has_requirements("NoDigitsHere$"));
        assert!(!password_has_requirements("NoSymbols123a"));
    }
}
