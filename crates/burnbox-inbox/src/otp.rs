//! One-time code extraction.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximal decimal runs. The regex engine never splits a digit run, so
/// filtering matches by length enforces the non-digit-boundary requirement:
/// a 6-digit window inside a 10-digit number is never produced.
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

const OTP_LENGTHS: [usize; 3] = [4, 6, 8];

/// First standalone run of exactly 4, 6, or 8 decimal digits, scanning left
/// to right. Returns `None` when no run of a plausible code length exists.
pub fn extract_otp(text: &str) -> Option<String> {
    DIGIT_RUN
        .find_iter(text)
        .find(|run| OTP_LENGTHS.contains(&run.as_str().len()))
        .map(|run| run.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_six_digit_code() {
        assert_eq!(
            extract_otp("Your code is 482913 today").as_deref(),
            Some("482913")
        );
    }

    #[test]
    fn extracts_four_and_eight_digit_codes() {
        assert_eq!(extract_otp("pin: 0042.").as_deref(), Some("0042"));
        assert_eq!(extract_otp("token 12345678 expires").as_deref(), Some("12345678"));
    }

    #[test]
    fn ignores_runs_of_other_lengths() {
        assert_eq!(extract_otp("order #12345678901 shipped"), None);
        assert_eq!(extract_otp("room 12345"), None);
        assert_eq!(extract_otp("floor 3"), None);
        assert_eq!(extract_otp("no digits at all"), None);
    }

    #[test]
    fn never_matches_inside_a_longer_run() {
        // A 10-digit phone number must not yield a spurious shorter match.
        assert_eq!(extract_otp("call 5551234567 now"), None);
    }

    #[test]
    fn first_plausible_run_wins() {
        assert_eq!(
            extract_otp("use 1234 or fall back to 567890").as_deref(),
            Some("1234")
        );
        // An implausible run before a plausible one is skipped.
        assert_eq!(
            extract_otp("ref 99 then code 482913").as_deref(),
            Some("482913")
        );
    }

    #[test]
    fn leading_zeros_are_preserved() {
        assert_eq!(extract_otp("code 004213").as_deref(), Some("004213"));
    }
}
