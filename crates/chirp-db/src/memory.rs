use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{Result, anyhow, bail};
use chirp_types::{Account, Message};

use crate::store::{AccountStore, MessageStore};

/// In-process store for ephemeral runs and tests. Ids count up from 1 and are
/// never handed out twice, matching the SQLite engine.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: BTreeMap<i64, Account>,
    username_index: HashMap<String, i64>,
    messages: BTreeMap<i64, Message>,
    last_account_id: i64,
    last_message_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>> {
        self.state.read().map_err(|e| anyhow!("Store lock poisoned: {}", e))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>> {
        self.state.write().map_err(|e| anyhow!("Store lock poisoned: {}", e))
    }
}

impl AccountStore for MemoryStore {
    fn create_account(&self, username: &str, password: &str) -> Result<Option<Account>> {
        let mut state = self.write()?;
        if state.username_index.contains_key(username) {
            return Ok(None);
        }

        state.last_account_id += 1;
        let account = Account {
            account_id: state.last_account_id,
            username: username.to_string(),
            password: password.to_string(),
        };
        state.username_index.insert(account.username.clone(), account.account_id);
        state.accounts.insert(account.account_id, account.clone());
        Ok(Some(account))
    }

    fn get_account_by_id(&self, account_id: i64) -> Result<Option<Account>> {
        Ok(self.read()?.accounts.get(&account_id).cloned())
    }

    fn get_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        let state = self.read()?;
        Ok(state
            .username_index
            .get(username)
            .and_then(|id| state.accounts.get(id))
            .cloned())
    }

    fn get_account_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>> {
        Ok(self
            .get_account_by_username(username)?
            .filter(|account| account.password == password))
    }
}

impl MessageStore for MemoryStore {
    fn insert_message(
        &self,
        posted_by: i64,
        message_text: &str,
        time_posted_epoch: i64,
    ) -> Result<Message> {
        let mut state = self.write()?;
        if !state.accounts.contains_key(&posted_by) {
            bail!("account {} does not exist", posted_by);
        }

        state.last_message_id += 1;
        let message = Message {
            message_id: state.last_message_id,
            posted_by,
            message_text: message_text.to_string(),
            time_posted_epoch,
        };
        state.messages.insert(message.message_id, message.clone());
        Ok(message)
    }

    fn get_messages(&self) -> Result<Vec<Message>> {
        Ok(self.read()?.messages.values().cloned().collect())
    }

    fn get_message_by_id(&self, message_id: i64) -> Result<Option<Message>> {
        Ok(self.read()?.messages.get(&message_id).cloned())
    }

    fn get_messages_by_account(&self, account_id: i64) -> Result<Vec<Message>> {
        Ok(self
            .read()?
            .messages
            .values()
            .filter(|m| m.posted_by == account_id)
            .cloned()
            .collect())
    }

    fn update_message_text(&self, message_id: i64, message_text: &str) -> Result<usize> {
        let mut state = self.write()?;
        match state.messages.get_mut(&message_id) {
            Some(message) => {
                message.message_text = message_text.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_message(&self, message_id: i64) -> Result<usize> {
        let removed = self.write()?.messages.remove(&message_id);
        Ok(usize::from(removed.is_some()))
    }
}
