//! Inbox service façade.
//!
//! Ties the generators, synthesizer, and stores together for the UI layer.
//! Storage failures are non-fatal throughout: freshly created records are
//! always returned for current-session display, persistence permitting.

use std::sync::Arc;

use anyhow::Result;
use burnbox_storage::{CredentialRecord, InboxConfig, MessageRecord, Storage};
use tracing::{info, warn};

use crate::generator::{generate_random_email, generate_secure_password};
use crate::notify::NotificationSink;
use crate::strength::evaluate_strength;
use crate::synthesizer::synthesize_message;

pub struct InboxService {
    storage: Arc<Storage>,
    sink: Arc<dyn NotificationSink>,
    config: InboxConfig,
}

impl InboxService {
    pub fn new(storage: Arc<Storage>, sink: Arc<dyn NotificationSink>) -> Self {
        let config = storage.config.get().unwrap_or_else(|err| {
            warn!(error = %err, "Failed to read inbox config, using defaults");
            InboxConfig::default()
        });
        Self {
            storage,
            sink,
            config,
        }
    }

    pub fn config(&self) -> &InboxConfig {
        &self.config
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Fabricate and persist a fresh credential. The record is returned even
    /// when persistence fails; the session keeps the in-memory copy.
    pub fn create_credential(&self) -> CredentialRecord {
        let email = generate_random_email();
        let password = generate_secure_password();
        let strength = evaluate_strength(&password);
        let record = CredentialRecord::new(email, password, strength);

        if let Err(err) = self.storage.credentials.put(&record) {
            warn!(error = %err, id = %record.id, "Failed to persist credential");
        }
        info!(id = %record.id, email = %record.email, "Credential created");
        record
    }

    /// Create a first credential only when none exist yet; returns it, or
    /// `None` when the store already has history.
    pub fn ensure_initial_credential(&self) -> Result<Option<CredentialRecord>> {
        if self.storage.credentials.count()? == 0 {
            Ok(Some(self.create_credential()))
        } else {
            Ok(None)
        }
    }

    /// Synthesize one message, persist it, and notify the sink. Sink
    /// failures are logged and never reach the store-write path.
    pub async fn deliver_message(&self) -> MessageRecord {
        let record = synthesize_message();

        if let Err(err) = self.storage.messages.put(&record) {
            warn!(error = %err, id = %record.id, "Failed to persist message");
        }

        if let Err(err) = self
            .sink
            .notify(&record.sender, record.otp.as_deref(), &record.subject)
            .await
        {
            warn!(error = %err, sender = %record.sender, "Notification sink failed");
        }

        record
    }

    /// Newest-first credentials, capped for display.
    pub fn recent_credentials(&self) -> Result<Vec<CredentialRecord>> {
        let mut records = self.storage.credentials.load_all()?;
        records.truncate(self.config.display_cap);
        Ok(records)
    }

    /// Newest-first messages, capped for display.
    pub fn recent_messages(&self) -> Result<Vec<MessageRecord>> {
        let mut records = self.storage.messages.load_all()?;
        records.truncate(self.config.display_cap);
        Ok(records)
    }

    pub fn delete_credential(&self, id: &str) -> Result<bool> {
        Ok(self.storage.credentials.delete(id)?)
    }

    pub fn delete_message(&self, id: &str) -> Result<bool> {
        Ok(self.storage.messages.delete(id)?)
    }

    pub fn clear_messages(&self) -> Result<()> {
        Ok(self.storage.messages.clear()?)
    }
}
