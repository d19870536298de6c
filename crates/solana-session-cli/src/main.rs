/*
[INPUT]:  CLI arguments and session environment variables
[OUTPUT]: Wallet session operations exercised from the command line
[POS]:    Binary entry point - presentation-layer stand-in
[UPDATE]: When changing CLI flags or adding subcommands
*/

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use solana_session_adapter::{
    LocalKeyProvider, SessionConfig, SessionManager, SessionStatus, Transaction,
};

#[derive(Parser, Debug)]
#[command(name = "solana-session", version, about = "Solana wallet session operations")]
struct Cli {
    /// Directory holding the local provider's key material
    #[arg(long = "key-dir", value_name = "PATH", default_value = ".solana-session/keys")]
    key_dir: PathBuf,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and print the wallet address
    Login,
    /// Disconnect and clear the local session
    Logout,
    /// Print the session status and wallet address
    Status,
    /// Query the native-token balance in SOL
    Balance,
    /// Sign a UTF-8 message and print the signature as hex
    SignMessage {
        message: String,
    },
    /// Sign an opaque transaction payload given as hex bytes
    SignTransaction {
        message_hex: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = SessionConfig::from_env().context("load session configuration")?;
    let provider = Arc::new(LocalKeyProvider::new(&config, &args.key_dir));
    let manager = SessionManager::new(config, provider).context("build session manager")?;

    // explicit one-time startup restoration, decoupled from any view lifecycle
    manager.restore_session().await;

    match args.command {
        Command::Login => {
            let identity = manager.login().await.context("login")?;
            info!(%identity, "login complete");
            println!("{identity}");
        }
        Command::Logout => {
            manager.logout().await.context("logout")?;
            println!("logged out");
        }
        Command::Status => match manager.status() {
            SessionStatus::Authenticated { public_key, since } => {
                println!("authenticated as {public_key} (since {since})");
            }
            SessionStatus::Failed { reason } => println!("failed: {reason}"),
            other => println!("{other:?}"),
        },
        Command::Balance => {
            let balance = manager.get_balance().await.context("get balance")?;
            println!("{balance} SOL");
        }
        Command::SignMessage { message } => {
            let signature = manager.sign_message(&message).await.context("sign message")?;
            println!("{}", hex::encode(signature));
        }
        Command::SignTransaction { message_hex } => {
            let message = hex::decode(message_hex.trim()).context("decode transaction hex")?;
            let signed = manager
                .sign_transaction(Transaction::new(message))
                .await
                .context("sign transaction")?;
            println!("{}", hex::encode(signed.signature));
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sign_message() {
        let cli = Cli::parse_from(["solana-session", "sign-message", "TEST"]);
        match cli.command {
            Command::SignMessage { message } => assert_eq!(message, "TEST"),
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.key_dir, PathBuf::from(".solana-session/keys"));
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_parse_key_dir_override() {
        let cli = Cli::parse_from(["solana-session", "--key-dir", "/tmp/keys", "status"]);
        assert_eq!(cli.key_dir, PathBuf::from("/tmp/keys"));
        assert!(matches!(cli.command, Command::Status));
    }

    #[test]
    fn test_manager_builds_from_config() {
        let config = SessionConfig::new("client-123");
        let provider = Arc::new(LocalKeyProvider::new(&config, std::env::temp_dir()));
        assert!(SessionManager::new(config, provider).is_ok());
    }

    #[test]
    fn test_empty_client_id_rejected() {
        let config = SessionConfig::new("");
        let provider = Arc::new(LocalKeyProvider::new(&config, std::env::temp_dir()));
        let err = SessionManager::new(config, provider).unwrap_err();
        assert!(err.to_string().contains("client_id"));
    }
}
