use arguments::{Arguments, Command};
use authentication::{AuthGate, ViewState};
use clap::Parser;
use config::{Config, Settings};
use coordinator::{DeleteOutcome, DeletionCoordinator, WipeOutcome};
use credentials::TokenStore;
use futures::future::join_all;
use log::info;
use prompt::TerminalPrompt;
use selection::{delete_targets, NameFilter};
use snafu::{whatever, ResultExt, Whatever};
use storage::client::HttpStorageClient;
use util::WIPE_VIEW;

mod arguments;
mod authentication;
mod config;
mod confirm_setting;
mod coordinator;
mod credentials;
mod prompt;
mod selection;
mod storage;
mod util;
mod view;

#[cfg(test)]
mod test_fixtures;

type Coordinator = DeletionCoordinator<HttpStorageClient, TerminalPrompt>;

/// Commands that need an authenticated view with a loaded listing.
enum ViewAction {
    List,
    Delete {
        paths: Vec<String>,
        filter: Option<NameFilter>,
    },
    Wipe,
}

#[tokio::main]
#[snafu::report]
async fn main() -> Result<(), Whatever> {
    env_logger::init();

    let arguments = Arguments::parse();
    let config = Config::load(arguments.config.as_deref())?;
    let settings = Settings::resolve(&arguments, config)?;
    let token_store = TokenStore::new(&settings.username)
        .whatever_context("Could not open the credential store")?;

    match arguments.command {
        Command::Login { token } => {
            authentication::login(&settings, &token_store, token).await?;
            Ok(())
        }
        Command::Logout => {
            let forgotten = token_store
                .forget()
                .whatever_context("Could not remove the stored token")?;
            if forgotten {
                println!("Logged out {}", settings.username);
            } else {
                println!("No token stored for {}", settings.username);
            }
            Ok(())
        }
        Command::List => open_view(&settings, &token_store, &ViewAction::List).await,
        Command::Delete { paths, matching } => {
            let filter = match matching {
                Some(pattern) => Some(
                    NameFilter::new(&pattern)
                        .with_whatever_context(|_| format!("Invalid pattern {}", pattern))?,
                ),
                None => None,
            };
            let action = ViewAction::Delete { paths, filter };
            open_view(&settings, &token_store, &action).await
        }
        Command::Wipe => open_view(&settings, &token_store, &ViewAction::Wipe).await,
    }
}

/// Settles authentication once per view. An unauthenticated view goes
/// through the login flow and is then opened again.
async fn open_view(
    settings: &Settings,
    token_store: &TokenStore,
    action: &ViewAction,
) -> Result<(), Whatever> {
    let mut redirected = false;
    loop {
        let token = token_store
            .token()
            .whatever_context("Could not read the stored token")?;
        let client = HttpStorageClient::new(settings.base_url.clone(), token)
            .whatever_context("Could not create the storage client")?;

        let mut gate = AuthGate::new(WIPE_VIEW);
        let state = gate
            .check(&client)
            .await
            .whatever_context("Could not check authentication")?
            .clone();

        match state {
            ViewState::Authenticated { username } => {
                let prompt = TerminalPrompt::new(settings.confirm);
                let coordinator = DeletionCoordinator::new(client, prompt, &settings.root);
                return run(&coordinator, &username, action).await;
            }
            ViewState::RedirectToAuth { next } if !redirected => {
                info!("Not authenticated, redirecting to login before {}", next);
                authentication::login(settings, token_store, None).await?;
                redirected = true;
            }
            _ => whatever!("Not authenticated"),
        }
    }
}

async fn run(coordinator: &Coordinator, username: &str, action: &ViewAction) -> Result<(), Whatever> {
    coordinator
        .load_listing()
        .await
        .whatever_context("Error loading files")?;

    match action {
        ViewAction::List => {
            println!("{}", view::render(&coordinator.snapshot(), username));
            Ok(())
        }
        ViewAction::Delete { paths, filter } => {
            let targets = delete_targets(paths, filter.as_ref(), &coordinator.listing());
            if targets.is_empty() {
                println!("No files matched");
                return Ok(());
            }

            let results = join_all(targets.iter().map(|path| coordinator.delete_one(path))).await;
            println!("{}", view::render(&coordinator.snapshot(), username));

            let mut failed = 0;
            for (path, result) in targets.iter().zip(results) {
                match result {
                    Ok(DeleteOutcome::Deleted) => println!("Deleted {}", path),
                    Ok(DeleteOutcome::Declined) => println!("Kept {}", path),
                    Ok(DeleteOutcome::AlreadyDeleting) => {
                        println!("{} is already being deleted", path)
                    }
                    Err(err) => {
                        println!("{}", snafu::Report::from_error(err));
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                whatever!("{} of {} deletions failed", failed, targets.len());
            }
            Ok(())
        }
        ViewAction::Wipe => {
            let outcome = coordinator.delete_all().await;
            println!("{}", view::render(&coordinator.snapshot(), username));

            match outcome.whatever_context("Wipe did not complete")? {
                WipeOutcome::Wiped(report) => println!("Wiped: {}", report),
                WipeOutcome::Declined => println!("Nothing was deleted"),
                WipeOutcome::NothingToDelete => println!("No files found."),
                WipeOutcome::AlreadyDeleting => println!("A deletion is already in progress"),
            }
            Ok(())
        }
    }
}
