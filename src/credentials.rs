use keyring::Entry;

use crate::util::KEYRING_SERVICE;

/// API token of one user, kept in the platform keyring.
pub struct TokenStore {
    entry: Entry,
}

impl TokenStore {
    pub fn new(username: &str) -> Result<TokenStore, keyring::Error> {
        Ok(TokenStore {
            entry: Entry::new(KEYRING_SERVICE, username)?,
        })
    }

    pub fn token(&self) -> Result<Option<String>, keyring::Error> {
        match self.entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn store(&self, token: &str) -> Result<(), keyring::Error> {
        self.entry.set_password(token)
    }

    /// Returns whether a token was stored.
    pub fn forget(&self) -> Result<bool, keyring::Error> {
        match self.entry.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(err) => Err(err),
        }
    }
}
