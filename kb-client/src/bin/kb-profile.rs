use anyhow::{Context, Result};
use clap::Parser;
use kb_client::backend::{RecipeBackend, RestBackend};
use kb_client::config::Config;
use kb_client::session::AuthClient;
use kb_client::storage::StorageClient;
use std::path::PathBuf;

/// Show or update your profile, including the avatar image
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Set the public username
    #[arg(long)]
    username: Option<String>,
    /// Set the first name
    #[arg(long)]
    first_name: Option<String>,
    /// Set the last name
    #[arg(long)]
    last_name: Option<String>,
    /// Set the address
    #[arg(long)]
    address: Option<String>,
    /// Upload this image as the new avatar
    #[arg(long)]
    avatar: Option<PathBuf>,
    /// Also list your recipes, newest first
    #[arg(long)]
    recipes: bool,
}

fn image_content_type(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let config = Config::from_env()?;

    let auth = AuthClient::new(&config);
    let mut session = auth.fetch_session().await?;

    if let Some(path) = &args.avatar {
        let content = std::fs::read(path)
            .with_context(|| format!("Reading avatar image {}", path.display()))?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        let url = StorageClient::new(&config)
            .upload_avatar(
                &session.user_id,
                &extension,
                image_content_type(&extension),
                content,
            )
            .await?;
        session.profile.avatar_url = Some(url);
    }

    let mut changed = args.avatar.is_some();
    for (field, value) in [
        (&mut session.profile.username, args.username),
        (&mut session.profile.first_name, args.first_name),
        (&mut session.profile.last_name, args.last_name),
        (&mut session.profile.address, args.address),
    ] {
        if let Some(value) = value {
            *field = Some(value);
            changed = true;
        }
    }
    if changed {
        auth.update_profile(&session.profile).await?;
        println!("Profile updated");
    }

    println!("User id: {}", session.user_id);
    println!("Email:   {}", session.email);
    let profile = &session.profile;
    for (label, value) in [
        ("Username", &profile.username),
        ("First name", &profile.first_name),
        ("Last name", &profile.last_name),
        ("Address", &profile.address),
        ("Avatar", &profile.avatar_url),
    ] {
        if let Some(value) = value {
            println!("{}: {}", label, value);
        }
    }

    if args.recipes {
        println!("\nYour recipes:");
        let backend = RestBackend::new(&config);
        for recipe in backend.list_recipes_by_owner(&session.user_id).await? {
            println!("{}  {} ({} servings)", recipe.id, recipe.name, recipe.servings);
        }
    }
    Ok(())
}
