use anyhow::Result;
use clap::Parser;
use kb_client::config::Config;
use kb_client::session::AuthClient;

/// Check that the configured credentials resolve to a signed-in session
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let _ = Args::parse();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e:#}");
            eprintln!("Set KOCHBUCH_BACKEND_URL, KOCHBUCH_ANON_KEY and KOCHBUCH_ACCESS_TOKEN");
            eprintln!("in your environment or a .env file.");
            std::process::exit(1);
        }
    };

    println!("Checking session against {}...", config.backend_url);
    let session = AuthClient::new(&config).fetch_session().await?;

    println!("\nAuthentication successful!");
    println!("User id: {}", session.user_id);
    println!("Email:   {}", session.email);
    if let Some(username) = &session.profile.username {
        println!("Username: {}", username);
    }
    Ok(())
}
