use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use booklist_client::config::{load_config, schema_json};
use booklist_client::models::{BookQuery, Credentials, RegistrationForm, SessionRecord};
use booklist_client::startup::build_state;
use booklist_client::state::AppState;
use booklist_client::utils::logger::init_logging;

const PASSWORD_ENV: &str = "BOOKLIST_PASSWORD";

#[derive(Parser)]
#[command(name = "booklist")]
#[command(about = "Command line client for the booklist catalog", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(long, short, env = "BOOKLIST_CONFIG", default_value = "./config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and persist the session. The password is read from
    /// `BOOKLIST_PASSWORD`, or from stdin when that is unset.
    Login { email: String },
    /// Create an account; the password is read like `login` does
    Register { first_name: String, email: String },
    /// Sign out and forget the persisted session
    Logout,
    /// Show the persisted session and its privileges
    Whoami,
    /// Resolve a location through the navigation guard
    Navigate { location: String },
    /// Search the catalog
    Books {
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        isbn: Option<String>,
    },
    /// Print the JSON schema of the configuration file
    Schema,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The schema needs neither a config file nor a session.
    if let Commands::Schema = cli.command {
        if let Err(e) = print_schema() {
            eprintln!("Error rendering schema: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let config = Arc::new(load_config(&cli.config));
    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Error initialising logging: {}", e);
        std::process::exit(1);
    }

    let state = match build_state(config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error starting up: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&state, cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_schema() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", schema_json()?);
    Ok(())
}

/// Reads the password from the environment, falling back to one line of stdin.
fn read_password() -> Result<String, Box<dyn std::error::Error>> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(format!("no password given; set {} or type it on stdin", PASSWORD_ENV).into());
    }
    Ok(password)
}

async fn run(state: &AppState, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Login { email } => {
            let credentials = Credentials {
                email,
                password: read_password()?,
            };
            let response = state.client.users().login(&credentials).await?;
            let record = SessionRecord::from_login_response(&response.data)
                .ok_or("login response did not contain a user record")?;
            let mut store = state.session_store();
            store.set(Some(record))?;
            info!("Logged in as {}", credentials.email);
            println!(
                "Logged in as {} ({})",
                credentials.email,
                store.privilege()
            );
        }
        Commands::Register { first_name, email } => {
            let form = RegistrationForm {
                first_name,
                email,
                password: read_password()?,
            };
            state.client.users().register(&form).await?;
            println!("Registered {}; log in to continue", form.email);
        }
        Commands::Logout => {
            // The local session goes regardless of what the server says.
            if let Err(e) = state.client.users().logout().await {
                warn!("Server logout failed: {}", e);
            }
            state.session_store().logout()?;
            println!("Logged out");
        }
        Commands::Whoami => {
            let store = state.session_store();
            match store.current() {
                Some(record) => {
                    let email = record
                        .get("email")
                        .and_then(|v| v.as_str())
                        .unwrap_or("<no email>");
                    println!("{}", email);
                    println!("  role:      {}", store.role().unwrap_or("<none>"));
                    println!("  privilege: {}", store.privilege());
                    println!("  logged in: {}", store.is_logged_in());
                }
                None => println!("Not logged in"),
            }
        }
        Commands::Navigate { location } => {
            let navigation = state.router.navigate(&location)?;
            for from in &navigation.redirected_from {
                println!("redirected from {}", from);
            }
            println!(
                "{} ({})",
                navigation.route.full_path, navigation.route.name
            );
        }
        Commands::Books {
            q,
            page,
            limit,
            genre,
            isbn,
        } => {
            let query = BookQuery {
                q,
                page,
                limit,
                genre,
                isbn,
            };
            let response = state.client.books().list(&query).await?;
            println!("{}", serde_json::to_string_pretty(&response.data)?);
        }
        Commands::Schema => print_schema()?,
    }
    Ok(())
}
