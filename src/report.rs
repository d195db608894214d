//! Plain-text rendering of match results, nutrition analyses and shopping lists.
//!
//! Every function returns a `String` so the CLI only has to print it.

use std::fmt::Write;

use crate::recipe_aggregator::{IngredientBreakdown, RecipeNutrition};
use crate::recipe_matcher::RecipeMatch;
use crate::shopping_list::ShoppingItem;
use crate::store::{Recipe, RecipeIngredientRow};

/// Width of a full bar in the text charts.
pub const BAR_WIDTH: usize = 40;

const BREAKDOWN_HEADERS: [&str; 7] = [
    "Ingredient",
    "Energy",
    "Protein",
    "Carbs",
    "Fat",
    "Fiber",
    "Sodium",
];

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(len.clamp(1, BAR_WIDTH))
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>, header: &str) -> usize {
    names
        .map(|n| n.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
}

pub fn render_matches(matches: &[RecipeMatch]) -> String {
    if matches.is_empty() {
        return "No recipes found\n".to_string();
    }
    let width = name_width(matches.iter().map(|m| m.name.as_str()), "Name");
    let mut out = String::new();
    let _ = writeln!(out, "{:>4}  {:<width$}  Instructions", "ID", "Name", width = width);
    for m in matches {
        let preview = m.instructions_preview().replace('\n', " ");
        let _ = writeln!(out, "{:>4}  {:<width$}  {}", m.id, m.name, preview, width = width);
    }
    out
}

pub fn render_recipe(recipe: &Recipe, ingredients: &[RecipeIngredientRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{}, diet: {})", recipe.name, recipe.id, recipe.diet);
    let _ = writeln!(out, "\nIngredients:");
    for row in ingredients {
        let _ = writeln!(out, "  - {}: {:.0} g", row.name, row.quantity_g);
    }
    let _ = writeln!(out, "\nInstructions:\n{}", recipe.instructions);
    out
}

fn render_breakdown_table(out: &mut String, rows: &[IngredientBreakdown]) {
    let width = name_width(rows.iter().map(|r| r.name.as_str()), BREAKDOWN_HEADERS[0]);
    let _ = write!(out, "{:<width$}", BREAKDOWN_HEADERS[0], width = width);
    for header in &BREAKDOWN_HEADERS[1..] {
        let _ = write!(out, " {:>10}", header);
    }
    out.push('\n');
    for row in rows {
        let _ = write!(out, "{:<width$}", row.name, width = width);
        for (_, value) in row.nutrition.fields() {
            let _ = write!(out, " {:>10.2}", value);
        }
        out.push('\n');
    }
}

fn render_energy_chart(out: &mut String, rows: &[&IngredientBreakdown]) {
    let width = name_width(rows.iter().map(|r| r.name.as_str()), "");
    let max = rows.iter().map(|r| r.nutrition.kcal).fold(0.0_f64, f64::max);
    for row in rows {
        let _ = writeln!(
            out,
            "  {:<width$}  {:>8.2}  {}",
            row.name,
            row.nutrition.kcal,
            bar(row.nutrition.kcal, max),
            width = width
        );
    }
}

/// Totals, macronutrient distribution, energy chart and breakdown table.
/// With `top = Some(n)` the energy chart lists only the `n` largest contributors.
pub fn render_nutrition(title: &str, nutrition: &RecipeNutrition, top: Option<usize>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    if nutrition.is_empty() {
        let _ = writeln!(out, "No ingredients recorded");
        return out;
    }

    let totals: Vec<String> = nutrition
        .totals
        .fields()
        .iter()
        .map(|(label, value)| format!("{}: {:.2}", label, value))
        .collect();
    let _ = writeln!(out, "{}", totals.join("  "));

    let dist = nutrition.macro_distribution();
    let _ = writeln!(out, "\nMacronutrient distribution");
    for (label, pct) in [
        ("Protein", dist.protein_pct),
        ("Carbohydrate", dist.carbohydrate_pct),
        ("Fat", dist.fat_pct),
    ] {
        let _ = writeln!(out, "  {:<12}  {:>5.1}%  {}", label, pct, bar(pct, 100.0));
    }

    let chart_rows = match top {
        Some(n) => {
            let _ = writeln!(out, "\nTop {} ingredients by energy (kcal)", n);
            nutrition.top_by_energy(n)
        }
        None => {
            let _ = writeln!(out, "\nEnergy contribution by ingredient (kcal)");
            nutrition.breakdown.iter().collect()
        }
    };
    render_energy_chart(&mut out, &chart_rows);

    out.push('\n');
    render_breakdown_table(&mut out, &nutrition.breakdown);
    out
}

pub fn render_shopping_list(items: &[ShoppingItem]) -> String {
    if items.is_empty() {
        return "Shopping list is empty\n".to_string();
    }
    items
        .iter()
        .map(|item| format!("{}: {} g\n", item.name, item.quantity_g))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe_aggregator::{aggregate_nutrition, NutritionProfile};

    fn rows() -> Vec<RecipeIngredientRow> {
        vec![
            RecipeIngredientRow {
                name: "chicken".to_string(),
                quantity_g: 200.0,
                profile: NutritionProfile {
                    kcal: 165.0,
                    protein_g: 31.0,
                    fat_g: 3.6,
                    sodium_mg: 74.0,
                    ..Default::default()
                },
            },
            RecipeIngredientRow {
                name: "olive oil".to_string(),
                quantity_g: 10.0,
                profile: NutritionProfile {
                    kcal: 884.0,
                    fat_g: 100.0,
                    ..Default::default()
                },
            },
        ]
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(0.0, 10.0), "");
        assert_eq!(bar(10.0, 10.0).len(), BAR_WIDTH);
        assert_eq!(bar(5.0, 10.0).len(), BAR_WIDTH / 2);
        assert_eq!(bar(0.001, 10.0).len(), 1);
    }

    #[test]
    fn test_render_matches_empty_and_preview() {
        assert_eq!(render_matches(&[]), "No recipes found\n");

        let m = RecipeMatch {
            id: 7,
            name: "Soup".to_string(),
            instructions: "Boil\nServe".to_string(),
        };
        let out = render_matches(&[m]);
        assert!(out.contains("Soup"));
        assert!(out.contains("Boil Serve"));
        assert!(out.lines().nth(1).unwrap().trim_start().starts_with('7'));
    }

    #[test]
    fn test_render_nutrition_sections() {
        let nutrition = aggregate_nutrition(&rows());
        let out = render_nutrition("Chicken", &nutrition, None);
        assert!(out.starts_with("Chicken\n"));
        assert!(out.contains("Energy (kcal): 418.40"));
        assert!(out.contains("Macronutrient distribution"));
        assert!(out.contains("Energy contribution by ingredient"));
        assert!(out.contains("olive oil"));
        assert!(out.contains("330.00"));
    }

    #[test]
    fn test_render_nutrition_top_n() {
        let nutrition = aggregate_nutrition(&rows());
        let out = render_nutrition("All", &nutrition, Some(1));
        assert!(out.contains("Top 1 ingredients by energy"));
    }

    #[test]
    fn test_render_nutrition_empty() {
        let out = render_nutrition("Nothing", &RecipeNutrition::default(), None);
        assert!(out.contains("No ingredients recorded"));
    }

    #[test]
    fn test_render_shopping_list() {
        let items = vec![ShoppingItem {
            name: "rice".to_string(),
            quantity_g: 250.0,
        }];
        assert_eq!(render_shopping_list(&items), "rice: 250 g\n");
        assert_eq!(render_shopping_list(&[]), "Shopping list is empty\n");
    }
}
