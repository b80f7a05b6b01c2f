use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::usecases::operation::OperationArgs;

#[derive(Debug, Parser)]
#[command(
    name = "fxa-bridge",
    about = "Issue account operations over a shared event channel"
)]
pub struct Cli {
    /// Path to config file (default: ./config.toml, or $FXA_BRIDGE_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Send one operation as a JSON line on stdout and wait for its reply on stdin
    Call(CallArgs),
    /// List supported operations and their wire method names
    Methods,
}

#[derive(Debug, Clone, Args)]
pub struct CallArgs {
    /// Operation name, e.g. fetch-account or sign-in
    pub operation: String,

    #[arg(long)]
    pub email: Option<String>,

    /// Prompted for when omitted on sign-in/sign-up
    #[arg(long)]
    pub password: Option<String>,

    /// fetch-assertion only; sent as null when omitted
    #[arg(long)]
    pub silent: Option<bool>,

    /// fetch-assertion only; sent as null when omitted
    #[arg(long)]
    pub audience: Option<String>,
}

impl CallArgs {
    pub fn operation_args(&self) -> OperationArgs {
        OperationArgs {
            email: self.email.clone(),
            password: self.password.clone(),
            silent: self.silent,
            audience: self.audience.clone(),
        }
    }
}
