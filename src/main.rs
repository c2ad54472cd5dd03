//! Leadbook - a lightweight CLI for tracking sales leads.

use std::io::{BufRead, Write};

use tracing::{error, info};

use leadbook::app::{render_table, App, LeadFields};
use leadbook::cli::{Cli, Command};
use leadbook::config::Config;
use leadbook::error::{LeadbookError, Result};
use leadbook::lead::Lead;
use leadbook::store::session::SessionProvider;
use leadbook::{app, logging, store};

fn main() {
    logging::init();

    // A local .env may provide SUPABASE_URL / SUPABASE_ANON_KEY
    let _ = dotenvy::dotenv();

    if let Err(e) = run() {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

#[tokio::main]
async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    // Configuration precedence: CLI flags, then config file, then environment.
    let config_path = cli.config_path();
    let mut config = Config::load_from_file(&config_path)?;
    config.store.apply_env_defaults();
    if let Some(url) = &cli.store_url {
        config.store.url = Some(url.clone());
    }
    if let Some(key) = &cli.anon_key {
        config.store.anon_key = Some(key.clone());
    }

    let resolved = config.store.resolve()?;
    info!("Store: {}", config.store.display_string());

    let sessions = SessionProvider::new(&resolved)?;

    match cli.command {
        Command::Login { email } => {
            let password = rpassword::prompt_password("Password: ")
                .map_err(|e| LeadbookError::auth(format!("Failed to read password: {e}")))?;
            let session = sessions.sign_in(&email, &password).await?;
            let who = session
                .user
                .and_then(|user| user.email)
                .unwrap_or(email);
            println!("Signed in as {who}");
            return Ok(());
        }
        Command::Logout => {
            match sessions.current_session()? {
                Some(session) => {
                    sessions.sign_out(&session).await?;
                    println!("Signed out");
                }
                None => println!("No active session"),
            }
            return Ok(());
        }
        Command::Whoami => {
            match sessions.current_session()? {
                Some(session) => {
                    let user = sessions.current_user(&session).await?;
                    let email = user.email.as_deref().unwrap_or("(no email)");
                    println!("{email} ({})", user.id);
                }
                None => println!("Not signed in"),
            }
            return Ok(());
        }
        command => {
            let access_token = sessions
                .current_session()?
                .map(|session| session.access_token);
            let store = store::connect(&resolved, access_token)?;
            let app = App::new(store);
            run_lead_command(&app, command).await
        }
    }
}

async fn run_lead_command(app: &App, command: Command) -> Result<()> {
    match command {
        Command::List { search, sort } => {
            let sort = app::parse_sort(&sort)?;
            let leads = app.list(&search, sort).await?;
            if leads.is_empty() {
                println!("No leads found");
            } else {
                print!("{}", render_table(&leads));
                println!("{} total", leads.len());
            }
        }
        Command::Add {
            name,
            business,
            instagram,
            email,
            status,
            notes,
        } => {
            let lead = app
                .add(LeadFields {
                    name: Some(name),
                    business,
                    instagram,
                    email,
                    status,
                    notes,
                })
                .await?;
            println!("Created lead {}", lead.id);
        }
        Command::Show { id } => {
            let lead = app.show(&id).await?;
            print_lead(&lead);
        }
        Command::Edit {
            id,
            name,
            business,
            instagram,
            email,
            status,
            notes,
        } => {
            let lead = app
                .edit(
                    &id,
                    LeadFields {
                        name,
                        business,
                        instagram,
                        email,
                        status,
                        notes,
                    },
                )
                .await?;
            println!("Updated lead {}", lead.id);
        }
        Command::Status { id, status } => {
            let lead = app.set_status(&id, &status).await?;
            println!("Lead {} is now {}", lead.id, lead.status_label());
        }
        Command::Notes { id, notes } => {
            let lead = app.set_notes(&id, &notes).await?;
            println!("Updated notes on lead {}", lead.id);
        }
        Command::Delete { id, yes } => {
            if !yes && !confirm("Delete this lead? This cannot be undone.")? {
                println!("Aborted");
                return Ok(());
            }
            app.delete(&id).await?;
            println!("Deleted lead {id}");
        }
        Command::Export {
            search,
            sort,
            output,
        } => {
            let sort = app::parse_sort(&sort)?;
            let count = app.export(&search, sort, &output).await?;
            println!("Exported {count} leads to {}", output.display());
        }
        Command::Login { .. } | Command::Logout | Command::Whoami => {
            return Err(LeadbookError::internal("auth command reached lead handler"));
        }
    }
    Ok(())
}

fn print_lead(lead: &Lead) {
    println!("id:         {}", lead.id);
    println!("name:       {}", lead.name.as_deref().unwrap_or(""));
    println!("business:   {}", lead.business.as_deref().unwrap_or(""));
    println!(
        "instagram:  {}",
        lead.instagram_handle.as_deref().unwrap_or("")
    );
    println!("email:      {}", lead.email.as_deref().unwrap_or(""));
    println!("status:     {}", lead.status_label());
    println!("notes:      {}", lead.notes.as_deref().unwrap_or(""));
    println!(
        "date added: {}",
        lead.date_added
            .map(|d| d.to_rfc3339())
            .unwrap_or_default()
    );
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout()
        .flush()
        .map_err(|e| LeadbookError::internal(format!("Failed to flush stdout: {e}")))?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| LeadbookError::internal(format!("Failed to read input: {e}")))?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}
