use anyhow::{anyhow, Context, Result};
use recipe_finder::cli::{parse_args, Commands};
use recipe_finder::config::Config;
use recipe_finder::data_loader::{load_ingredients_csv, load_recipes_json, seed_demo_data};
use recipe_finder::recipe_aggregator::{calculate_consolidated_nutrition, calculate_recipe_nutrition, NutritionProfile};
use recipe_finder::recipe_matcher::{find_recipes, AvailableIngredients, DietFilter, KNOWN_DIETS};
use recipe_finder::report::{render_matches, render_nutrition, render_recipe, render_shopping_list};
use recipe_finder::shopping_list::generate_shopping_list;
use recipe_finder::store::{Ingredient, RecipeStore};

fn main() -> Result<()> {
    dotenv::dotenv().ok(); // Load .env for RECIPE_DB_PATH
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli_args = parse_args();
    let config = Config::resolve(cli_args.db.clone())?;
    log::info!("Using database {:?}", config.database_path);

    let mut store = RecipeStore::open(&config.database_path)
        .with_context(|| format!("Failed to open recipe store at {:?}", config.database_path))?;

    run(&mut store, cli_args.command)
}

fn run(store: &mut RecipeStore, command: Commands) -> Result<()> {
    match command {
        Commands::Init => {
            let stats = store.stats()?;
            println!(
                "Database ready: {} ingredients, {} recipes",
                stats.ingredient_count, stats.recipe_count
            );
        }
        Commands::Seed => {
            seed_demo_data(store).context("Could not load demo data")?;
            let stats = store.stats()?;
            println!(
                "Demo data loaded: {} ingredients, {} recipes",
                stats.ingredient_count, stats.recipe_count
            );
        }
        Commands::AddIngredient { name, kcal, protein, carbohydrate, fat, fiber, sodium } => {
            let ingredient = Ingredient {
                name,
                profile: NutritionProfile {
                    kcal,
                    protein_g: protein,
                    carbohydrate_g: carbohydrate,
                    fat_g: fat,
                    fiber_g: fiber,
                    sodium_mg: sodium,
                },
            };
            let id = store
                .upsert_ingredient(&ingredient)
                .with_context(|| format!("Could not add ingredient '{}'", ingredient.name))?;
            println!("Saved ingredient '{}' (id {})", ingredient.name.trim(), id);
        }
        Commands::ImportIngredients { csv } => {
            let ingredients = load_ingredients_csv(&csv)
                .with_context(|| format!("Failed to read ingredients from '{}'", csv.display()))?;
            let count = store
                .upsert_ingredients(&ingredients)
                .context("Could not save imported ingredients")?;
            println!("Imported {} ingredients", count);
        }
        Commands::ImportRecipes { json } => {
            let recipes = load_recipes_json(&json)
                .with_context(|| format!("Failed to read recipes from '{}'", json.display()))?;
            let ids = store
                .upsert_recipes(&recipes)
                .context("Could not save imported recipes")?;
            println!("Imported {} recipes", ids.len());
        }
        Commands::Find { ingredients, diet, json } => {
            let available = AvailableIngredients::parse_list(&ingredients);
            let matches = find_recipes(store, &available, &DietFilter::parse(&diet))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else {
                print!("{}", render_matches(&matches));
            }
        }
        Commands::Show { recipe_id } => {
            let recipe = store
                .get_recipe(recipe_id)?
                .ok_or_else(|| anyhow!("No recipe with id {}", recipe_id))?;
            let rows = store.recipe_ingredients(recipe_id)?;
            print!("{}", render_recipe(&recipe, &rows));
        }
        Commands::Nutrition { recipe_id, json } => {
            let nutrition = calculate_recipe_nutrition(store, recipe_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&nutrition)?);
            } else {
                let title = match store.get_recipe(recipe_id)? {
                    Some(recipe) => format!("Nutrition analysis: {}", recipe.name),
                    None => format!("Nutrition analysis: recipe {} not found", recipe_id),
                };
                print!("{}", render_nutrition(&title, &nutrition, None));
            }
        }
        Commands::Analyze { recipe_ids, top } => {
            let nutrition = calculate_consolidated_nutrition(store, &recipe_ids)?;
            let title = format!("Consolidated nutrition analysis of {} recipes", recipe_ids.len());
            print!("{}", render_nutrition(&title, &nutrition, Some(top)));
        }
        Commands::ShoppingList { recipe_ids } => {
            let items = generate_shopping_list(store, &recipe_ids)?;
            print!("{}", render_shopping_list(&items));
        }
        Commands::Recipes => {
            for recipe in store.list_recipes()? {
                println!("{:>4}  {} [{}]", recipe.id, recipe.name, recipe.diet);
            }
        }
        Commands::Ingredients => {
            for stored in store.list_ingredients()? {
                let values: Vec<String> = stored
                    .ingredient
                    .profile
                    .fields()
                    .iter()
                    .map(|(label, value)| format!("{} {:.1}", label, value))
                    .collect();
                println!("{}: {}", stored.ingredient.name, values.join(", "));
            }
        }
        Commands::Diets => {
            let in_use = store.diet_tags()?;
            println!("In use: {}", in_use.join(", "));
            println!("Suggested: {}", KNOWN_DIETS.join(", "));
        }
    }
    Ok(())
}
