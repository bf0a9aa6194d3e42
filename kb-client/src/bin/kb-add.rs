use anyhow::Result;
use clap::Parser;
use kb_client::backend::RestBackend;
use kb_client::config::Config;
use kb_client::drafts::DraftStore;
use kb_client::editor::RecipeEditor;
use kb_client::forms::{IngredientLine, RecipeForm};
use kb_client::session::AuthClient;

/// Add a new recipe to the shared cookbook
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// The name of the recipe
    name: String,
    /// A short description of the dish
    #[arg(short, long)]
    description: String,
    /// How many servings the recipe yields
    #[arg(short, long)]
    servings: String,
    /// Step-by-step preparation instructions
    #[arg(short, long)]
    instructions: String,
    /// Category id, see `kb-browse --categories`
    #[arg(short, long)]
    category: String,
    /// Optional image URL for the recipe
    #[arg(long)]
    img_url: Option<String>,
    /// Ingredient lines as "name|quantity unit" or "name|quantity unit|info";
    /// repeat for each ingredient
    #[arg(short = 'I', long = "ingredient")]
    ingredients: Vec<IngredientLine>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let config = Config::from_env()?;

    let session = AuthClient::new(&config).fetch_session().await?;
    let editor = RecipeEditor::new(
        RestBackend::new(&config),
        DraftStore::open(&config.draft_dir)?,
        session,
    );

    let form = RecipeForm {
        name: args.name,
        description: args.description,
        servings: args.servings,
        instructions: args.instructions,
        img_url: args.img_url.unwrap_or_default(),
        category_id: args.category,
    };

    let recipe = editor.create(&form, &args.ingredients).await?;
    println!("Created recipe {} ({})", recipe.id, recipe.name);
    Ok(())
}
