use anyhow::Result;
use clap::Parser;
use kb_client::backend::{RecipeBackend, RestBackend};
use kb_client::browse;
use kb_client::config::Config;
use kb_client::session::AuthClient;

/// Browse the shared cookbook: categories, recipe listings and single recipes
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Show this recipe instead of a listing
    recipe: Option<String>,
    /// Restrict the listing to one category id
    #[arg(short, long)]
    category: Option<String>,
    /// List the available categories
    #[arg(long)]
    categories: bool,
    /// List only your own recipes, newest first
    #[arg(short, long)]
    mine: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let config = Config::from_env()?;
    let backend = RestBackend::new(&config);

    if args.categories {
        for category in backend.list_categories().await? {
            println!("{}  {}", category.id, category.name);
        }
        return Ok(());
    }

    if let Some(recipe_id) = &args.recipe {
        // Browsing works without a session; the session only decides whether
        // the edit/delete hint is shown.
        let session = AuthClient::new(&config).fetch_session().await.ok();
        let detail = browse::fetch_detail(&backend, session.as_ref(), recipe_id).await?;
        println!("{}", detail.recipe.name);
        println!("Servings: {}", detail.recipe.servings);
        println!("\n{}\n", detail.recipe.description);
        println!("Ingredients:");
        for ingredient in &detail.ingredients {
            println!("  - {}", browse::format_ingredient(ingredient));
        }
        println!("\nInstructions:\n{}", detail.recipe.instructions);
        if detail.editable {
            println!("\n(you own this recipe; kb-edit {} to change it)", detail.recipe.id);
        }
        return Ok(());
    }

    let recipes = if args.mine {
        let session = AuthClient::new(&config).fetch_session().await?;
        backend.list_recipes_by_owner(&session.user_id).await?
    } else {
        backend.list_recipes(args.category.as_deref()).await?
    };
    for recipe in recipes {
        println!("{}  {} ({} servings)", recipe.id, recipe.name, recipe.servings);
    }
    Ok(())
}
