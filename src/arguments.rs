use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::confirm_setting::ConfirmSetting;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(short, long, global = true)]
    pub username: Option<String>,

    /// Remote directory to manage
    #[arg(short, long, global = true)]
    pub root: Option<String>,

    #[arg(long, value_enum, global = true)]
    pub confirm: Option<ConfirmSetting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the stored files
    List,
    /// Delete single files
    Delete {
        #[arg(required_unless_present = "matching")]
        paths: Vec<String>,

        /// Also delete every listed file whose name matches this regex
        #[arg(short, long)]
        matching: Option<String>,
    },
    /// Delete all files and stored app data
    Wipe,
    /// Store an API token for this user
    Login {
        #[arg(long)]
        token: Option<String>,
    },
    /// Forget the stored API token
    Logout,
}
