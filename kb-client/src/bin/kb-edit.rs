use anyhow::Result;
use clap::Parser;
use kb_client::backend::RestBackend;
use kb_client::config::Config;
use kb_client::drafts::DraftStore;
use kb_client::editor::{FormField, RecipeEditor};
use kb_client::forms::IngredientLine;
use kb_client::session::AuthClient;

/// Edit or delete one of your own recipes
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// The id of the recipe to edit
    recipe_id: String,
    /// Replace the recipe name
    #[arg(long)]
    name: Option<String>,
    /// Replace the description
    #[arg(long)]
    description: Option<String>,
    /// Replace the servings count
    #[arg(long)]
    servings: Option<String>,
    /// Replace the instructions
    #[arg(long)]
    instructions: Option<String>,
    /// Replace the image URL
    #[arg(long)]
    img_url: Option<String>,
    /// Replace the category id
    #[arg(long)]
    category: Option<String>,
    /// Replace the whole ingredient list; repeat for each line,
    /// "name|quantity unit" or "name|quantity unit|info"
    #[arg(short = 'I', long = "ingredient")]
    ingredients: Vec<IngredientLine>,
    /// Delete the recipe instead of editing it
    #[arg(long)]
    delete: bool,
    /// Discard the local draft for this recipe and change nothing
    #[arg(long)]
    cancel: bool,
    /// Apply the changes to the local draft only, without submitting
    #[arg(long)]
    dry: bool,
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

    if args.delete {
        editor.delete(&args.recipe_id).await?;
        println!("Deleted recipe {}", args.recipe_id);
        return Ok(());
    }

    let mut edit = editor.load_for_edit(&args.recipe_id).await?;

    let changes = [
        (FormField::Name, &args.name),
        (FormField::Description, &args.description),
        (FormField::Servings, &args.servings),
        (FormField::Instructions, &args.instructions),
        (FormField::ImgUrl, &args.img_url),
        (FormField::CategoryId, &args.category),
    ];
    for (field, value) in changes {
        if let Some(value) = value {
            edit.set_field(field, value);
        }
    }
    if !args.ingredients.is_empty() {
        edit.set_ingredients(args.ingredients);
    }

    if args.cancel {
        edit.cancel();
        println!("Discarded draft for recipe {}", args.recipe_id);
        return Ok(());
    }
    if args.dry {
        println!("Draft saved for recipe {}; nothing submitted", args.recipe_id);
        return Ok(());
    }

    editor.submit_update(&edit).await?;
    println!("Updated recipe {}", args.recipe_id);
    Ok(())
}
