//! StreamOne CLI - log in to the StreamOne API and run commands in a session.
//!
//! The session is kept in the configured session store (a file in the cache
//! directory by default), so it carries over between invocations until it
//! expires.

use std::io;

use anyhow::{bail, Context, Result};
use streamone_core::{Arguments, Config, SessionClient, SessionStore};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ============================================================================
// Constants
// ============================================================================

/// Environment variable read for the password before prompting
const PASSWORD_ENV: &str = "STREAMONE_PASSWORD";

const USAGE: &str = "\
Usage: streamone <command>

Commands:
  login <username>                        Log in and store the session
  status                                  Show the current session
  logout                                  End the current session
  call <command> <action> [name=value...] Run an API command in the session";

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let mut config = Config::load()?;
    config.apply_env();

    match command.as_str() {
        "login" => {
            let username = args.get(1).context("Missing <username>")?;
            login(&config, username).await
        }
        "status" => status(&config),
        "logout" => logout(&config).await,
        "call" => call(&config, &args[1..]).await,
        "help" | "--help" | "-h" => {
            println!("{}", USAGE);
            Ok(())
        }
        other => bail!("Unknown command: {}\n\n{}", other, USAGE),
    }
}

fn session_client(config: &Config) -> Result<SessionClient<dyn SessionStore>> {
    let api = config.api_client()?;
    let store = config.open_session_store()?;
    Ok(SessionClient::new(api, store))
}

async fn login(config: &Config, username: &str) -> Result<()> {
    let client = session_client(config)?;

    let password = match std::env::var(PASSWORD_ENV) {
        Ok(password) => password,
        Err(_) => rpassword::prompt_password(format!("Password for {}: ", username))
            .context("Failed to read password")?,
    };

    client.login(username, &password).await?;
    info!(username = %username, "Session stored");

    // Reload so environment overrides are not written to the config file
    let mut saved = Config::load()?;
    saved.last_username = Some(username.to_string());
    saved.save()?;

    let store = client.store();
    println!(
        "Logged in as {} (session expires in {}s)",
        store.user_id()?,
        store.timeout()?.num_seconds()
    );
    Ok(())
}

fn status(config: &Config) -> Result<()> {
    let store = config.open_session_store()?;
    if !store.has_session() {
        println!("No active session");
        return Ok(());
    }

    println!("Session:    {}", store.id()?);
    println!("User:       {}", store.user_id()?);
    println!("Expires in: {}s", store.timeout()?.num_seconds());
    if let Some(username) = &config.last_username {
        println!("Username:   {}", username);
    }
    Ok(())
}

async fn logout(config: &Config) -> Result<()> {
    let client = session_client(config)?;
    if !client.has_session() {
        println!("No active session");
        return Ok(());
    }
    client.logout().await?;
    println!("Logged out");
    Ok(())
}

async fn call(config: &Config, args: &[String]) -> Result<()> {
    let (command, action, rest) = match args {
        [command, action, rest @ ..] => (command, action, rest),
        _ => bail!("Usage: streamone call <command> <action> [name=value...]"),
    };

    let mut arguments = Arguments::new();
    for pair in rest {
        let (name, value) = pair
            .split_once('=')
            .with_context(|| format!("Argument is not name=value: {}", pair))?;
        arguments.push(name, value);
    }

    let client = session_client(config)?;
    let response = client.send(command, action, &arguments).await?;

    if !response.success() {
        bail!(
            "API call failed with status {}: {}",
            response.header.status,
            response.header.status_message
        );
    }
    println!("{}", serde_json::to_string_pretty(&response.body)?);
    Ok(())
}
