//! A warranty tracking TUI client.
//!
//! The client signs in against a warranty backend, lists tracked
//! warranties with their coverage status, registers new ones, and drives
//! the premium upgrade payment flow.

use anyhow::{Context, Result};
use chrono::Utc;
use pico_args::Arguments;
use std::io::{self, Write};

use warranty_vault::WarrantyStatus;
use wv_client::{
    api_client::ApiClient,
    session::SessionStore,
    tui_app::{SessionEnd, TuiApp},
};

const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

const HELP: &str = "\
Track product warranties against a warranty backend

USAGE:
  wv_client [OPTIONS]

OPTIONS:
  --server URL          Backend base URL  [default: http://localhost:8080, env: WV_SERVER_URL]
  --email EMAIL         Email for login
  --password PASS       Password for login
  --register            Create the account before logging in
  --tui                 Use TUI (Terminal UI) mode [default: false]

FLAGS:
  -h, --help            Print help information
";

struct Args {
    server_url: String,
    email: Option<String>,
    password: Option<String>,
    register: bool,
    use_tui: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        server_url: pargs
            .value_from_str("--server")
            .ok()
            .or_else(|| std::env::var("WV_SERVER_URL").ok())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
        email: pargs.opt_value_from_str("--email").ok().flatten(),
        password: pargs.opt_value_from_str("--password").ok().flatten(),
        register: pargs.contains("--register"),
        use_tui: pargs.contains("--tui"),
    };

    run(args).await
}

fn prompt_or(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => {
            print!("{label}");
            io::stdout().flush()?;
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            Ok(input.trim().to_string())
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let store = SessionStore::new()?;
    let mut api_client = ApiClient::new(args.server_url.clone());

    // Resume a persisted session unless the user explicitly wants a fresh
    // login. The token is used as-is; a stale one surfaces as a failed
    // fetch, not a separate re-auth flow.
    let mut logged_in = false;
    if !args.register
        && args.email.is_none()
        && let Some(token) = store.load()
    {
        api_client.set_access_token(token);
        logged_in = true;
        println!("Resuming stored session...");
    }

    if !logged_in {
        let email = prompt_or(args.email, "Email: ")?;
        let password = prompt_or(args.password, "Password: ")?;

        if args.register {
            println!("Registering {}...", email);
            api_client
                .register(email.clone(), password.clone())
                .await
                .context("Failed to register")?;
            println!("Registered successfully!");
        }

        println!("Logging in as {}...", email);
        api_client
            .login(email, password)
            .await
            .context("Failed to login")?;
        println!("Login successful!");

        if let Some(token) = api_client.access_token() {
            store.save(token)?;
        }
    }

    if args.use_tui {
        // TUI mode - the full dashboard
        let terminal = ratatui::init();

        let tui_app = TuiApp::new(args.server_url.clone());
        let result = tui_app.run(api_client, terminal).await;

        // Restore terminal
        ratatui::restore();

        match result? {
            SessionEnd::Logout => {
                store.clear()?;
                println!("Logged out.");
            }
            SessionEnd::Keep => {}
        }
    } else {
        // CLI mode - print the dashboard once
        let warranties = api_client
            .list_warranties()
            .await
            .context("Failed to fetch warranties")?;

        if warranties.is_empty() {
            println!("\nNo warranties yet. Run with --tui and use 'add' to register one.");
            return Ok(());
        }

        let now = Utc::now();
        println!("\nYour warranties:");
        for (i, warranty) in warranties.iter().enumerate() {
            let status = warranty.status(now);
            let remaining = match status {
                WarrantyStatus::Expired => String::new(),
                _ => format!(", {} day(s) left", warranty.days_until_expiry(now)),
            };
            println!(
                "  {}. {} - purchased {} - {} month(s) - expires {} [{}{}]",
                i + 1,
                warranty.item_name,
                warranty.purchase_date,
                warranty.duration,
                warranty.expiry_date(),
                status,
                remaining,
            );
        }
    }

    Ok(())
}
