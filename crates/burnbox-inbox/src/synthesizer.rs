//! Synthetic message generation.

use burnbox_storage::MessageRecord;
use tracing::warn;

use crate::generator::{pick, random_int};
use crate::otp::extract_otp;
use crate::templates::{CODE_PLACEHOLDER, SENDER_TEMPLATES};

const CODE_LENGTHS: [u32; 3] = [4, 6, 8];

/// Fabricate one inbox message: pick a sender, mint a code, render subject
/// and body, and re-scan the rendered body as a consistency check.
pub fn synthesize_message() -> MessageRecord {
    let template =
        &SENDER_TEMPLATES[random_int(0, SENDER_TEMPLATES.len() as u32 - 1) as usize];
    let code = generate_code();

    let subject = pick(template.subjects).replace(CODE_PLACEHOLDER, &code);
    let body = pick(template.bodies).replace(CODE_PLACEHOLDER, &code);

    // Guards template authoring mistakes; the generated code wins when the
    // rendered body no longer scans.
    let otp = match extract_otp(&body) {
        Some(found) => found,
        None => {
            warn!(
                sender = template.sender,
                "Rendered body yielded no code, keeping the generated one"
            );
            code.clone()
        }
    };

    MessageRecord::new(template.sender.to_string(), subject, body, Some(otp))
}

/// A 4, 6, or 8 digit decimal code; leading zeros allowed.
fn generate_code() -> String {
    let length = CODE_LENGTHS[random_int(0, CODE_LENGTHS.len() as u32 - 1) as usize];
    (0..length)
        .map(|_| char::from(b'0' + random_int(0, 9) as u8))
        .collect()
}
