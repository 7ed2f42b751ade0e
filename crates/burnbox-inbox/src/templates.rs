//! Canned sender templates for synthetic messages.

/// A fictional sender with its pools of subject and body templates. Bodies
/// always carry the [`CODE_PLACEHOLDER`]; subjects may.
pub struct SenderTemplate {
    pub sender: &'static str,
    pub subjects: &'static [&'static str],
    pub bodies: &'static [&'static str],
}

/// Replaced with the generated code at synthesis time.
pub const CODE_PLACEHOLDER: &str = "%CODE%";

pub const SENDER_TEMPLATES: &[SenderTemplate] = &[
    SenderTemplate {
        sender: "CloudVault Security",
        subjects: &[
            "Your CloudVault verification code",
            "CloudVault sign-in attempt",
        ],
        bodies: &[
            "Your CloudVault verification code is %CODE%. It expires in 10 minutes.",
            "Someone tried signing in to your account. Enter %CODE% to confirm it was you.",
        ],
    },
    SenderTemplate {
        sender: "PayNow",
        subjects: &[
            "Confirm your PayNow transfer",
            "PayNow security check",
        ],
        bodies: &[
            "Use code %CODE% to authorize your transfer. Never share this code.",
            "We noticed a new device. Confirm with %CODE% to continue.",
        ],
    },
    SenderTemplate {
        sender: "Streamly",
        subjects: &[
            "Finish setting up your Streamly account",
            "Streamly login code",
        ],
        bodies: &[
            "Welcome to Streamly! Your activation code is %CODE%.",
            "Here is your one-time login code: %CODE%. It is valid for 15 minutes.",
        ],
    },
    SenderTemplate {
        sender: "Nimbus Drive",
        subjects: &[
            "Nimbus Drive two-step verification",
        ],
        bodies: &[
            "Your Nimbus Drive code is %CODE%. If you did not request it, you can ignore this message.",
            "Enter %CODE% to approve access from a new browser.",
        ],
    },
    SenderTemplate {
        sender: "TicketWise",
        subjects: &[
            "Your TicketWise booking code",
            "Action needed: verify your TicketWise email",
        ],
        bodies: &[
            "Confirm your booking with code %CODE%.",
            "Verify this address by entering %CODE% on the checkout page.",
        ],
    },
    SenderTemplate {
        sender: "Forge Social",
        subjects: &[
            "Forge Social confirmation",
        ],
        bodies: &[
            "Your confirmation code is %CODE%. Paste it into the app to continue.",
            "Tap verify and enter %CODE% to finish creating your profile.",
        ],
    },
];
