use cookbook_core::{Category, Favorites, Ingredient, Listing, NewRecipe, RecipeEngine, SavedSelections, SelectionOp};
use std::sync::Arc;

fn recipe(name: &str, ingredients: &[(&str, &str, &str)]) -> NewRecipe {
    NewRecipe::new(name, ingredients.iter().map(|(a, u, n)| Ingredient::new(a, u, n, "")).collect())
}

fn catalog() -> RecipeEngine {
    let engine = RecipeEngine::default();
    for r in [
        recipe("Curry Pie", &[("1", "lb", "potatoes"), ("2", "tbsp", "curry powder")]),
        recipe("Curry Pork 2", &[("2", "lbs", "pork"), ("1", "", "onion")]),
        recipe("Grilled Salmon", &[("1", "lb", "salmon"), ("1", "", "lemon")]),
        recipe("Bacon Pancakes", &[("4", "oz", "bacon"), ("1", "cup", "flour")]),
        recipe("Steak Frites", &[("1", "lb", "steak"), ("2", "", "potatoes")]),
        recipe("Apple Pie", &[("3", "", "apples")]),
        recipe("Apple Pie", &[("4", "", "apples"), ("1", "cup", "sugar")]),
    ] {
        engine.add_recipe(r).unwrap();
    }
    engine
}

fn names(recipes: &[Arc<cookbook_core::Recipe>]) -> Vec<&str> {
    recipes.iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn every_indexed_word_finds_its_recipe() {
    let engine = catalog();
    let state = engine.lock();
    for id in state.all_ids() {
        let r = state.find_by_id(id).unwrap();
        let mut words: Vec<String> = r.name.split_whitespace().map(str::to_lowercase).collect();
        for i in &r.ingredients {
            words.extend(i.name.split_whitespace().map(str::to_uppercase));
        }
        for word in words {
            let found = state.search(Some(word.as_str())).unwrap();
            assert!(found.iter().any(|f| f.id == id), "{word} should find {}", r.name);
        }
    }
}

#[test]
fn one_missing_term_excludes_a_recipe() {
    let engine = catalog();
    assert!(engine.search(Some("pork pie")).unwrap().is_empty());
    assert_eq!(names(&engine.search(Some("curry onion")).unwrap()), vec!["Curry Pork 2"]);
    assert!(engine.search(Some("curry onion banana")).unwrap().is_empty());
}

#[test]
fn results_are_grouped_by_name() {
    let engine = catalog();
    let found = engine.search(Some("apples")).unwrap();
    assert_eq!(names(&found), vec!["Apple Pie", "Apple Pie"]);
    assert!(found[0].id < found[1].id);

    let all = engine.list(&Listing::All);
    let mut sorted = names(&all);
    sorted.sort();
    assert_eq!(names(&all), sorted);
}

#[test]
fn absent_query_is_distinct_from_blank_query() {
    let engine = catalog();
    assert!(engine.search(None).is_none());
    assert_eq!(engine.search(Some("")).unwrap().len(), 0);
    assert!(engine.list(&Listing::Search("  ".into())).is_empty());
}

#[test]
fn categories_union_their_search_words() {
    let engine = catalog();
    let state = engine.lock();
    assert_eq!(names(&state.browse(Category::Pork)), vec!["Bacon Pancakes", "Curry Pork 2"]);
    assert_eq!(names(&state.browse(Category::Beef)), vec!["Steak Frites"]);
    assert_eq!(names(&state.browse(Category::Seafood)), vec!["Grilled Salmon"]);
    assert!(state.browse(Category::Chicken).is_empty());
    assert_eq!(
        names(&state.browse(Category::Vegetarian)),
        vec!["Apple Pie", "Apple Pie", "Curry Pie", "Grilled Salmon"]
    );
    assert_eq!(state.browse(Category::All).len(), 7);
}

#[test]
fn favorites_survive_a_catalog_rebuild_minus_stale_ids() {
    let engine = RecipeEngine::default();
    let recipes: Vec<_> = (0..13).map(|i| recipe(&format!("Recipe {i}"), &[]).with_id(i)).collect();
    engine.bulk_load(recipes).unwrap();
    for id in [3, 7, 12] {
        engine.apply(SelectionOp::AddFavorite(id)).unwrap();
    }
    let serialized = engine.lock().favorites().serialize();
    assert_eq!(serialized, "3 7 12");

    // the rebuilt catalog only has ids 0..=6
    let rebuilt: Vec<_> = (0..7).map(|i| recipe(&format!("Recipe {i}"), &[]).with_id(i)).collect();
    engine.rebuild(rebuilt, || SavedSelections { favorites: Some(serialized.clone()), shopping_list: None }).unwrap();
    assert_eq!(engine.lock().favorites().serialize(), "3");

    let mut state = engine.lock();
    state.load_favorites(Some("3 4")).unwrap();
    let ids: Vec<_> = state.favorites().ids().collect();
    assert_eq!(ids, vec![3, 4]);
}

#[test]
fn stale_favorite_id_is_dropped_on_load() {
    let mut favorites = Favorites::new();
    favorites.load_from_serialized(Some("3 7 12"), |id| id != 7).unwrap();
    let ids: Vec<_> = favorites.ids().collect();
    assert_eq!(ids, vec![3, 12]);
}

#[test]
fn favorites_round_trip() {
    let engine = catalog();
    engine.apply(SelectionOp::AddFavorite(5)).unwrap();
    engine.apply(SelectionOp::AddFavorite(1)).unwrap();
    let mut state = engine.lock();
    let before = state.favorites().clone();
    let serialized = before.serialize();
    state.load_favorites(Some(serialized.as_str())).unwrap();
    assert_eq!(state.favorites(), &before);
    assert_eq!(names(&state.favorite_recipes()), vec!["Apple Pie", "Curry Pork 2"]);
}

#[test]
fn zero_quantity_is_absent_from_serialization() {
    let engine = catalog();
    engine.apply(SelectionOp::SetQuantity { id: 1, quantity: 3 }).unwrap();
    engine.apply(SelectionOp::SetQuantity { id: 4, quantity: 1 }).unwrap();
    let outcome = engine.apply(SelectionOp::SetQuantity { id: 1, quantity: 0 }).unwrap();
    assert_eq!(outcome.serialized(), "4 1");
    assert_eq!(engine.lock().get_quantity(1), 0);
    assert_eq!(names(&engine.list(&Listing::ShoppingList)), vec!["Steak Frites"]);
}

#[test]
fn bulk_load_then_ad_hoc_insert_continues_the_counter() {
    let engine = RecipeEngine::default();
    engine.bulk_load(vec![recipe("A", &[]).with_id(0), recipe("B", &[]).with_id(1)]).unwrap();
    let added = engine.add_recipe(recipe("C", &[])).unwrap();
    assert_eq!(added.id, 2);
    assert!(engine.bulk_load(vec![recipe("D", &[]).with_id(9)]).is_err());
}

#[test]
fn concurrent_toggles_do_not_lose_updates() {
    let engine = Arc::new(catalog());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    engine.apply(SelectionOp::ToggleFavorite(2)).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    // 200 toggles leave the favorite unset
    assert!(!engine.lock().is_favorite(2));
}
