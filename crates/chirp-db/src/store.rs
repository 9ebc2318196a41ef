//! Per-entity persistence capabilities.
//!
//! Managers only see these traits, so any engine that implements both can sit
//! underneath them: [`crate::Database`] for SQLite and [`crate::MemoryStore`]
//! for an in-process map.

use anyhow::Result;
use chirp_types::{Account, Message};

pub trait AccountStore: Send + Sync {
    /// Inserts a new account and assigns its id.
    ///
    /// Returns `None` when the username is already taken. The check and the
    /// insert happen as one operation, so two racing registrations cannot both
    /// succeed.
    fn create_account(&self, username: &str, password: &str) -> Result<Option<Account>>;

    fn get_account_by_id(&self, account_id: i64) -> Result<Option<Account>>;

    fn get_account_by_username(&self, username: &str) -> Result<Option<Account>>;

    /// Exact, case-sensitive match on both fields.
    fn get_account_by_credentials(&self, username: &str, password: &str)
    -> Result<Option<Account>>;
}

pub trait MessageStore: Send + Sync {
    /// Inserts a message and assigns its id. Fails if `posted_by` does not
    /// name an existing account.
    fn insert_message(
        &self,
        posted_by: i64,
        message_text: &str,
        time_posted_epoch: i64,
    ) -> Result<Message>;

    /// All messages, ordered by id.
    fn get_messages(&self) -> Result<Vec<Message>>;

    fn get_message_by_id(&self, message_id: i64) -> Result<Option<Message>>;

    /// Messages posted by `account_id`, ordered by id.
    fn get_messages_by_account(&self, account_id: i64) -> Result<Vec<Message>>;

    /// Replaces the text of one message in a single operation. Returns the
    /// number of rows changed (0 or 1).
    fn update_message_text(&self, message_id: i64, message_text: &str) -> Result<usize>;

    /// Returns the number of rows removed (0 or 1).
    fn delete_message(&self, message_id: i64) -> Result<usize>;
}

/// Behaviour every engine must share. Each engine's test module runs these
/// against a fresh instance.
#[cfg(test)]
pub(crate) mod conformance {
    use super::*;

    pub fn accounts<S: AccountStore + MessageStore>(store: &S) {
        let bob = store.create_account("bob", "1234").unwrap().unwrap();
        assert_eq!(bob.username, "bob");
        assert_eq!(bob.password, "1234");

        assert!(store.create_account("bob", "other-password").unwrap().is_none());

        let alice = store.create_account("alice", "secret").unwrap().unwrap();
        assert_ne!(alice.account_id, bob.account_id);

        assert_eq!(store.get_account_by_id(bob.account_id).unwrap(), Some(bob.clone()));
        assert_eq!(store.get_account_by_id(9999).unwrap(), None);
        assert_eq!(store.get_account_by_username("alice").unwrap(), Some(alice));
        assert_eq!(store.get_account_by_username("Alice").unwrap(), None);

        assert_eq!(
            store.get_account_by_credentials("bob", "1234").unwrap(),
            Some(bob)
        );
        assert_eq!(store.get_account_by_credentials("bob", "1235").unwrap(), None);
        assert_eq!(store.get_account_by_credentials("bo", "1234").unwrap(), None);
    }

    pub fn messages<S: AccountStore + MessageStore>(store: &S) {
        assert!(store.get_messages().unwrap().is_empty());

        let bob = store.create_account("bob", "1234").unwrap().unwrap();
        let alice = store.create_account("alice", "secret").unwrap().unwrap();

        let first = store.insert_message(bob.account_id, "hello", 100).unwrap();
        let second = store.insert_message(alice.account_id, "hi bob", 200).unwrap();
        let third = store.insert_message(bob.account_id, "again", 300).unwrap();
        assert!(first.message_id < second.message_id);
        assert!(second.message_id < third.message_id);
        assert_eq!(first.posted_by, bob.account_id);
        assert_eq!(first.time_posted_epoch, 100);

        let all = store.get_messages().unwrap();
        assert_eq!(all, vec![first.clone(), second.clone(), third.clone()]);

        let by_bob = store.get_messages_by_account(bob.account_id).unwrap();
        assert_eq!(by_bob, vec![first.clone(), third.clone()]);
        assert!(store.get_messages_by_account(9999).unwrap().is_empty());

        assert_eq!(store.get_message_by_id(second.message_id).unwrap(), Some(second.clone()));
        assert_eq!(store.get_message_by_id(9999).unwrap(), None);

        assert_eq!(store.update_message_text(first.message_id, "edited").unwrap(), 1);
        assert_eq!(store.update_message_text(9999, "edited").unwrap(), 0);
        let edited = store.get_message_by_id(first.message_id).unwrap().unwrap();
        assert_eq!(edited.message_text, "edited");
        assert_eq!(edited.posted_by, first.posted_by);
        assert_eq!(edited.time_posted_epoch, first.time_posted_epoch);

        assert_eq!(store.delete_message(second.message_id).unwrap(), 1);
        assert_eq!(store.delete_message(second.message_id).unwrap(), 0);
        assert_eq!(store.get_message_by_id(second.message_id).unwrap(), None);
        assert_eq!(store.get_messages().unwrap().len(), 2);
    }

    pub fn ids_not_reused<S: AccountStore + MessageStore>(store: &S) {
        let bob = store.create_account("bob", "1234").unwrap().unwrap();
        let first = store.insert_message(bob.account_id, "one", 0).unwrap();
        store.delete_message(first.message_id).unwrap();

        let second = store.insert_message(bob.account_id, "two", 0).unwrap();
        assert!(second.message_id > first.message_id);
    }
}
