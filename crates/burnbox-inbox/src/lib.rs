//! Burnbox Inbox - the disposable-inbox engine.
//!
//! Fabricates throwaway credentials, synthesizes one-time-code messages on a
//! jittered timer, and maintains a bounded local history through
//! `burnbox-storage`. There is no real email transport and no verification:
//! every message is generated from a fixed sender-template catalog.
//!
//! The (external) UI layer consumes [`InboxService`] and
//! [`DeliveryScheduler`]; there is no network or CLI surface.

pub mod generator;
pub mod notify;
pub mod otp;
pub mod scheduler;
pub mod service;
pub mod strength;
pub mod synthesizer;
pub mod templates;

pub use generator::{
    generate_random_email, generate_secure_password, password_has_requirements, random_char,
    random_int,
};
pub use notify::{LogSink, NotificationSink};
pub use otp::extract_otp;
pub use scheduler::{DeliveryScheduler, SchedulerDelay};
pub use service::InboxService;
pub use strength::evaluate_strength;
pub use synthesizer::synthesize_message;

pub use burnbox_storage::{
    CredentialRecord, InboxConfig, MessageRecord, Storage, StoreBackend, Strength,
};
