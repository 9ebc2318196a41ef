use std::sync::Arc;

use chirp_db::AccountStore;
use chirp_types::Account;
use chirp_types::api::Credentials;
use chirp_types::models::{MIN_PASSWORD_LEN, text_len};
use tracing::{debug, info};

use crate::error::ServiceError;

/// Registration and login. Passwords are stored and compared verbatim.
pub struct AccountManager {
    store: Arc<dyn AccountStore>,
}

impl AccountManager {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Persists a new account and returns it with its assigned id.
    ///
    /// Fails with [`ServiceError::InvalidCredentials`] for an empty username or
    /// a password shorter than four UTF-16 code units, and with
    /// [`ServiceError::DuplicateUsername`] when the username is taken.
    pub fn register(&self, candidate: &Credentials) -> Result<Account, ServiceError> {
        if candidate.username.is_empty() || text_len(&candidate.password) < MIN_PASSWORD_LEN {
            debug!("Rejected registration with malformed credentials");
            return Err(ServiceError::InvalidCredentials);
        }

        if self.store.get_account_by_username(&candidate.username)?.is_some() {
            debug!("Rejected registration for taken username {}", candidate.username);
            return Err(ServiceError::DuplicateUsername(candidate.username.clone()));
        }

        // A concurrent registration can still win between the lookup and the
        // insert; the store reports that as `None`.
        let account = self
            .store
            .create_account(&candidate.username, &candidate.password)?
            .ok_or_else(|| ServiceError::DuplicateUsername(candidate.username.clone()))?;

        info!("Registered account {} ({})", account.account_id, account.username);
        Ok(account)
    }

    /// Returns the account whose username and password both match exactly.
    pub fn login(&self, candidate: &Credentials) -> Result<Account, ServiceError> {
        self.store
            .get_account_by_credentials(&candidate.username, &candidate.password)?
            .ok_or_else(|| {
                debug!("Failed login for {}", candidate.username);
                ServiceError::AuthenticationFailed
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirp_db::{Database, MemoryStore};

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    fn managers() -> Vec<AccountManager> {
        vec![
            AccountManager::new(Arc::new(MemoryStore::new())),
            AccountManager::new(Arc::new(Database::open_in_memory().unwrap())),
        ]
    }

    #[test]
    fn register_assigns_id_and_echoes_fields() {
        for manager in managers() {
            let account = manager.register(&creds("bob", "1234")).unwrap();
            assert!(account.account_id > 0);
            assert_eq!(account.username, "bob");
            assert_eq!(account.password, "1234");
        }
    }

    #[test]
    fn register_twice_is_duplicate_regardless_of_password() {
        for manager in managers() {
            manager.register(&creds("bob", "1234")).unwrap();
            let err = manager.register(&creds("bob", "completely-different")).unwrap_err();
            assert!(matches!(err, ServiceError::DuplicateUsername(name) if name == "bob"));
        }
    }

    #[test]
    fn short_passwords_are_invalid() {
        for manager in managers() {
            for password in ["", "a", "ab", "abc"] {
                let err = manager.register(&creds("bob", password)).unwrap_err();
                assert!(matches!(err, ServiceError::InvalidCredentials), "{password:?}");
            }
            assert!(manager.register(&creds("bob", "abcd")).is_ok());
        }
    }

    #[test]
    fn password_length_counts_utf16_units() {
        for manager in managers() {
            // Three code units, nine bytes.
            let err = manager.register(&creds("bob", "日本語")).unwrap_err();
            assert!(matches!(err, ServiceError::InvalidCredentials));

            // Two emoji are four code units.
            let account = manager.register(&creds("alice", "😀😀")).unwrap();
            assert_eq!(account.password, "😀😀");
        }
    }

    #[test]
    fn empty_username_is_invalid() {
        for manager in managers() {
            let err = manager.register(&creds("", "12345")).unwrap_err();
            assert!(matches!(err, ServiceError::InvalidCredentials));
        }
    }

    #[test]
    fn invalid_credentials_checked_before_duplicates() {
        for manager in managers() {
            manager.register(&creds("bob", "1234")).unwrap();
            let err = manager.register(&creds("bob", "12")).unwrap_err();
            assert!(matches!(err, ServiceError::InvalidCredentials));
        }
    }

    #[test]
    fn login_requires_exact_match() {
        for manager in managers() {
            let registered = manager.register(&creds("bob", "1234")).unwrap();

            assert_eq!(manager.login(&creds("bob", "1234")).unwrap(), registered);

            let mismatches = [("bob", "1235"), ("bob", "123"), ("Bob", "1234"), ("bobb", "1234")];
            for (username, password) in mismatches {
                let err = manager.login(&creds(username, password)).unwrap_err();
                assert!(matches!(err, ServiceError::AuthenticationFailed));
            }
        }
    }

    /// Looks like the username is free, then loses the insert to a
    /// concurrent registration.
    struct LostRace;

    impl AccountStore for LostRace {
        fn create_account(&self, _: &str, _: &str) -> anyhow::Result<Option<Account>> {
            Ok(None)
        }

        fn get_account_by_id(&self, _: i64) -> anyhow::Result<Option<Account>> {
            Ok(None)
        }

        fn get_account_by_username(&self, _: &str) -> anyhow::Result<Option<Account>> {
            Ok(None)
        }

        fn get_account_by_credentials(&self, _: &str, _: &str) -> anyhow::Result<Option<Account>> {
            Ok(None)
        }
    }

    #[test]
    fn register_losing_insert_race_is_duplicate() {
        let manager = AccountManager::new(Arc::new(LostRace));
        let err = manager.register(&creds("bob", "1234")).unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateUsername(name) if name == "bob"));
    }

    #[test]
    fn login_unknown_user_fails() {
        for manager in managers() {
            let err = manager.login(&creds("nobody", "1234")).unwrap_err();
            assert!(matches!(err, ServiceError::AuthenticationFailed));
        }
    }
}
