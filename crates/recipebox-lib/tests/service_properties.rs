//! Behavioural properties of the recipe service, checked against every
//! store backend.

mod common;

use recipebox_lib::{ListOptions, RecipeError, SortField, SortOrder, Step};

use common::{recipe_input, services};

#[tokio::test]
async fn created_recipes_are_retrievable_by_id() {
    for (backend, service, _dir) in services() {
        let created = service
            .add_recipe(recipe_input("Risotto aux champignons", &["Italien"]))
            .await
            .unwrap_or_else(|e| panic!("{backend}: {e}"));

        let found = service
            .get_recipe_by_id(&created.id)
            .await
            .unwrap_or_else(|e| panic!("{backend}: {e}"));
        assert_eq!(found.as_ref(), Some(&created), "{backend}");
        assert_eq!(created.tags, vec!["italien"], "{backend}");
    }
}

#[tokio::test]
async fn duplicate_step_orders_never_reach_the_store() {
    for (backend, service, _dir) in services() {
        let mut input = recipe_input("Soup", &[]);
        input.steps = vec![Step::new(2, "Boil"), Step::new(2, "Serve")];

        let err = service.add_recipe(input).await.unwrap_err();
        assert!(matches!(err, RecipeError::DuplicateStepOrder), "{backend}");

        let all = service.get_all_recipes(&ListOptions::default()).await.unwrap();
        assert!(all.is_empty(), "{backend}");
    }
}

#[tokio::test]
async fn validation_failures_list_every_message() {
    for (backend, service, _dir) in services() {
        let mut input = recipe_input("", &[]);
        input.ingredients.clear();

        let err = service.add_recipe(input).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed: ingredients must contain at least one ingredient, title is required",
            "{backend}"
        );
    }
}

#[tokio::test]
async fn default_listing_is_newest_first() {
    for (backend, service, _dir) in services() {
        for title in ["first", "second", "third"] {
            service.add_recipe(recipe_input(title, &[])).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let titles: Vec<String> = service
            .get_all_recipes(&ListOptions::default())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"], "{backend}");
    }
}

#[tokio::test]
async fn tag_filter_is_a_superset_match() {
    for (backend, service, _dir) in services() {
        service
            .add_recipe(recipe_input("Pasta", &["italien", "rapide"]))
            .await
            .unwrap();
        service
            .add_recipe(recipe_input("Pizza", &["italien"]))
            .await
            .unwrap();

        let options = ListOptions {
            tags: Some(vec!["italien".to_string(), "rapide".to_string()]),
            sort_by: SortField::Title,
            sort_order: SortOrder::Asc,
            ..ListOptions::default()
        };
        let titles: Vec<String> = service
            .get_all_recipes(&options)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Pasta"], "{backend}");
    }
}

#[tokio::test]
async fn malformed_ids_read_as_absent() {
    for (backend, service, _dir) in services() {
        assert!(
            service.get_recipe_by_id("not-an-id").await.unwrap().is_none(),
            "{backend}"
        );
    }
}
