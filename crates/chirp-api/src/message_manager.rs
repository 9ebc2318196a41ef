use std::sync::Arc;

use chirp_db::{AccountStore, MessageStore};
use chirp_types::Message;
use chirp_types::api::NewMessage;
use chirp_types::models::{MAX_MESSAGE_LEN, text_len};
use tracing::{debug, info};

use crate::error::ServiceError;

/// Validation and persistence for messages.
///
/// Lookups report absence as `None`. Mutations that name a missing account or
/// message fail with [`ServiceError::ReferenceNotFound`].
pub struct MessageManager {
    messages: Arc<dyn MessageStore>,
    accounts: Arc<dyn AccountStore>,
}

impl MessageManager {
    pub fn new(messages: Arc<dyn MessageStore>, accounts: Arc<dyn AccountStore>) -> Self {
        Self { messages, accounts }
    }

    /// Persists a message posted by an existing account.
    ///
    /// A missing `time_posted_epoch` is stamped with the current time.
    pub fn create_message(&self, candidate: &NewMessage) -> Result<Message, ServiceError> {
        if !is_valid_text(&candidate.message_text) {
            debug!("Rejected message with invalid text");
            return Err(ServiceError::InvalidMessageText);
        }

        let Some(posted_by) = candidate.posted_by else {
            return Err(ServiceError::ReferenceNotFound(
                "Account ID was not provided. Please include postedBy and try again.".into(),
            ));
        };
        if self.accounts.get_account_by_id(posted_by)?.is_none() {
            debug!("Rejected message for unknown account {}", posted_by);
            return Err(account_not_found(posted_by));
        }

        let time_posted_epoch = candidate
            .time_posted_epoch
            .unwrap_or_else(|| chrono::Utc::now().timestamp());

        let message =
            self.messages
                .insert_message(posted_by, &candidate.message_text, time_posted_epoch)?;

        info!("Account {} posted message {}", posted_by, message.message_id);
        Ok(message)
    }

    pub fn get_all_messages(&self) -> Result<Vec<Message>, ServiceError> {
        Ok(self.messages.get_messages()?)
    }

    pub fn get_message_by_id(&self, message_id: i64) -> Result<Option<Message>, ServiceError> {
        Ok(self.messages.get_message_by_id(message_id)?)
    }

    /// Returns `Some(1)` when a message was removed, `None` when there was
    /// nothing to remove.
    pub fn delete_message_by_id(&self, message_id: i64) -> Result<Option<usize>, ServiceError> {
        match self.messages.delete_message(message_id)? {
            0 => Ok(None),
            removed => {
                info!("Deleted message {}", message_id);
                Ok(Some(removed))
            }
        }
    }

    /// Replaces the text of an existing message and returns the row count (1).
    ///
    /// An unknown id is reported as [`ServiceError::ReferenceNotFound`] even
    /// when the new text is also invalid.
    pub fn update_message_by_id(
        &self,
        message_id: i64,
        message_text: &str,
    ) -> Result<usize, ServiceError> {
        if !is_valid_text(message_text) {
            if self.messages.get_message_by_id(message_id)?.is_none() {
                return Err(message_not_found(message_id));
            }
            debug!("Rejected update of message {} with invalid text", message_id);
            return Err(ServiceError::InvalidMessageText);
        }

        match self.messages.update_message_text(message_id, message_text)? {
            0 => Err(message_not_found(message_id)),
            updated => {
                info!("Updated message {}", message_id);
                Ok(updated)
            }
        }
    }

    /// Messages posted by `account_id`. An unknown account yields an empty list.
    pub fn get_all_messages_by_account_id(
        &self,
        account_id: i64,
    ) -> Result<Vec<Message>, ServiceError> {
        Ok(self.messages.get_messages_by_account(account_id)?)
    }
}

fn is_valid_text(text: &str) -> bool {
    (1..=MAX_MESSAGE_LEN).contains(&text_len(text))
}

fn account_not_found(account_id: i64) -> ServiceError {
    ServiceError::ReferenceNotFound(format!(
        "Account ID {account_id} was not found. Please check account ID and try again."
    ))
}

fn message_not_found(message_id: i64) -> ServiceError {
    ServiceError::ReferenceNotFound(format!(
        "Message ID {message_id} was not found. Please check message ID and try again."
    ))
}
