use dialoguer::{theme::ColorfulTheme, Password};
use log::{debug, info};
use snafu::{whatever, ResultExt, Whatever};

use crate::{
    config::Settings,
    credentials::TokenStore,
    storage::{client::HttpStorageClient, AuthProvider, StorageError, User},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Authenticated { username: String },
    RedirectToAuth { next: String },
}

/// One-shot authentication check for a view. It leaves `Loading` exactly
/// once and ignores everything after that.
#[derive(Debug)]
pub struct AuthGate {
    state: ViewState,
    next: String,
}

impl AuthGate {
    pub fn new(next: impl Into<String>) -> Self {
        AuthGate {
            state: ViewState::Loading,
            next: next.into(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn settle(&mut self, user: Option<User>) -> &ViewState {
        if self.state != ViewState::Loading {
            debug!("Authentication already settled as {:?}", self.state);
            return &self.state;
        }

        self.state = match user {
            Some(user) => ViewState::Authenticated {
                username: user.username,
            },
            None => ViewState::RedirectToAuth {
                next: self.next.clone(),
            },
        };
        &self.state
    }

    pub async fn check<A: AuthProvider>(&mut self, auth: &A) -> Result<&ViewState, StorageError> {
        if self.state != ViewState::Loading {
            return Ok(&self.state);
        }
        let user = auth.current_user().await?;
        Ok(self.settle(user))
    }
}

async fn verify<A: AuthProvider>(auth: &A) -> Result<User, Whatever> {
    let user = auth
        .current_user()
        .await
        .whatever_context("Could not verify the token")?;
    match user {
        Some(user) => Ok(user),
        None => whatever!("Login not successful, the token was rejected"),
    }
}

/// Asks for an API token unless one is given, checks it against the backend
/// and keeps it in the keyring.
pub async fn login(
    settings: &Settings,
    token_store: &TokenStore,
    token: Option<String>,
) -> Result<User, Whatever> {
    println!("Authenticating!");

    let token = match token {
        Some(token) => token,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("API token for {}", settings.username))
            .interact()
            .whatever_context("Could not read the token")?,
    };

    let client = HttpStorageClient::new(settings.base_url.clone(), Some(token.clone()))
        .whatever_context("Could not create the storage client")?;
    let user = verify(&client).await?;

    token_store
        .store(&token)
        .whatever_context("Could not store the token")?;
    info!("Stored token for {}", settings.username);
    println!("Logged in as {}!", user.username);

    Ok(user)
}
