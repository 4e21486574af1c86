mod common;

use std::sync::Arc;

use serde_json::json;

use recipebox_lambda_api::{build_router, handle_event, ApiContext};
use recipebox_lambda_shared::test_utils::{recipe_json, EventBuilder};
use recipebox_lambda_shared::{
    PROBLEM_INVALID_REQUEST, PROBLEM_RECIPE_NOT_FOUND,
    PROBLEM_ROUTE_NOT_FOUND, PROBLEM_SERVICE_UNAVAILABLE, PROBLEM_VALIDATION_FAILED,
};
use recipebox_lib::{StaticConfigSource, StoreProvider};

use common::{body_json, invoke, memory_router, problem, unreachable_router};

#[tokio::test]
async fn create_then_fetch_round_trip() {
    let (router, _store) = memory_router();

    let created = invoke(
        &router,
        EventBuilder::new("POST", "/recipes")
            .json_body(&recipe_json("Risotto aux champignons", &["Italien", " RAPIDE ", "italien"]))
            .build(),
    )
    .await;
    assert_eq!(created.status_code, 201);
    assert_eq!(created.header("content-type"), Some("application/json"));
    assert_eq!(created.header("access-control-allow-origin"), Some("*"));

    let recipe = body_json(&created);
    assert_eq!(recipe["tags"], json!(["italien", "rapide"]));
    assert_eq!(recipe["steps"][0]["order"], 1);
    assert_eq!(recipe["steps"][1]["order"], 2);
    assert_eq!(recipe["ingredients"][0]["unit"], "g");
    assert_eq!(recipe["ingredients"][2]["quantity"], 1.0);
    assert_eq!(recipe["ingredients"][2]["unit"], "");
    assert!(recipe["createdAt"].is_string());
    assert_eq!(recipe["createdAt"], recipe["updatedAt"]);

    let id = recipe["id"].as_str().expect("id assigned");
    let fetched = invoke(
        &router,
        EventBuilder::new("GET", &format!("/recipes/{id}")).build(),
    )
    .await;
    assert_eq!(fetched.status_code, 200);
    assert_eq!(body_json(&fetched), recipe);
}

#[tokio::test]
async fn duplicate_step_orders_are_rejected_without_writing() {
    let (router, store) = memory_router();
    let mut payload = recipe_json("Soup", &[]);
    payload["steps"] = json!([
        { "order": 1, "text": "Boil" },
        { "order": 1, "text": "Serve" }
    ]);

    let response = invoke(
        &router,
        EventBuilder::new("POST", "/recipes").json_body(&payload).build(),
    )
    .await;

    assert_eq!(response.status_code, 400);
    assert_eq!(
        response.header("content-type"),
        Some("application/problem+json")
    );
    assert_eq!(problem(&response).type_uri, PROBLEM_INVALID_REQUEST);
    assert_eq!(store.insert_attempts(), 0);
}

#[tokio::test]
async fn schema_violations_return_validation_failed() {
    let (router, _store) = memory_router();
    let payload = json!({
        "title": "   ",
        "servings": 0,
        "ingredients": [{ "name": "Rice" }],
        "steps": [{ "order": 1, "text": "Cook" }]
    });

    let response = invoke(
        &router,
        EventBuilder::new("POST", "/recipes").json_body(&payload).build(),
    )
    .await;

    assert_eq!(response.status_code, 400);
    let problem = problem(&response);
    assert_eq!(problem.type_uri, PROBLEM_VALIDATION_FAILED);
    assert_eq!(
        problem.detail.as_deref(),
        Some("validation failed: servings must be at least 1, title is required")
    );
    assert_eq!(problem.errors.len(), 2);
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let (router, store) = memory_router();

    for event in [
        EventBuilder::new("POST", "/recipes").raw_body("{not json").build(),
        EventBuilder::new("POST", "/recipes")
            .json_body(&json!({ "title": "Soup", "servings": "four" }))
            .build(),
        EventBuilder::new("POST", "/recipes").build(),
    ] {
        let response = invoke(&router, event).await;
        assert_eq!(response.status_code, 400);
        assert_eq!(problem(&response).type_uri, PROBLEM_INVALID_REQUEST);
    }
    assert_eq!(store.insert_attempts(), 0);
}

#[tokio::test]
async fn missing_and_malformed_ids_are_not_found() {
    let (router, _store) = memory_router();

    for path in [
        "/recipes/01890a5d-ac96-774b-bcce-b302099a8057",
        "/recipes/not-an-id",
    ] {
        let response = invoke(&router, EventBuilder::new("GET", path).build()).await;
        assert_eq!(response.status_code, 404, "{path}");
        assert_eq!(problem(&response).type_uri, PROBLEM_RECIPE_NOT_FOUND);
    }
}

#[tokio::test]
async fn list_filters_sorts_and_paginates() {
    let (router, _store) = memory_router();
    for (title, tags) in [
        ("Salade César", vec!["rapide"]),
        ("Pizza Margherita", vec!["italien", "rapide"]),
        ("Risotto aux champignons", vec!["italien"]),
    ] {
        let response = invoke(
            &router,
            EventBuilder::new("POST", "/recipes")
                .json_body(&recipe_json(title, &tags))
                .build(),
        )
        .await;
        assert_eq!(response.status_code, 201);
    }

    let titles = |response: &recipebox_lambda_shared::ApiResponse| -> Vec<String> {
        body_json(response)
            .as_array()
            .expect("array body")
            .iter()
            .map(|r| r["title"].as_str().unwrap_or_default().to_string())
            .collect()
    };

    let sorted = invoke(
        &router,
        EventBuilder::new("GET", "/recipes")
            .query("sortBy", "title")
            .query("sortOrder", "asc")
            .query("limit", "2")
            .query("skip", "0")
            .build(),
    )
    .await;
    assert_eq!(sorted.status_code, 200);
    assert_eq!(
        titles(&sorted),
        vec!["Pizza Margherita", "Risotto aux champignons"]
    );

    let italian = invoke(
        &router,
        EventBuilder::new("GET", "/recipes")
            .query("tags", "Italien,rapide")
            .build(),
    )
    .await;
    assert_eq!(titles(&italian), vec!["Pizza Margherita"]);

    let everything = invoke(&router, EventBuilder::new("GET", "/recipes").build()).await;
    assert_eq!(titles(&everything).len(), 3);
}

#[tokio::test]
async fn unrecognized_sort_order_lists_ascending() {
    let (router, _store) = memory_router();
    for title in ["Salade César", "Pizza Margherita", "Risotto aux champignons"] {
        let response = invoke(
            &router,
            EventBuilder::new("POST", "/recipes")
                .json_body(&recipe_json(title, &[]))
                .build(),
        )
        .await;
        assert_eq!(response.status_code, 201);
    }

    let response = invoke(
        &router,
        EventBuilder::new("GET", "/recipes")
            .query("sortBy", "title")
            .query("sortOrder", "ascending")
            .build(),
    )
    .await;
    assert_eq!(response.status_code, 200);
    let titles: Vec<String> = body_json(&response)
        .as_array()
        .expect("array body")
        .iter()
        .map(|r| r["title"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(
        titles,
        vec!["Pizza Margherita", "Risotto aux champignons", "Salade César"]
    );
}

#[tokio::test]
async fn captured_id_replaces_stale_path_parameter() {
    let (router, _store) = memory_router();
    let created = invoke(
        &router,
        EventBuilder::new("POST", "/recipes")
            .json_body(&recipe_json("Pizza Margherita", &[]))
            .build(),
    )
    .await;
    let id = body_json(&created)["id"].as_str().expect("id assigned").to_string();

    let fetched = invoke(
        &router,
        EventBuilder::new("GET", &format!("/recipes/{id}"))
            .path_param("id", "stale")
            .path_param("locale", "fr")
            .build(),
    )
    .await;
    assert_eq!(fetched.status_code, 200);
    assert_eq!(body_json(&fetched)["id"], id.as_str());
}

#[tokio::test]
async fn invalid_list_query_is_a_bad_request() {
    let (router, _store) = memory_router();
    let response = invoke(
        &router,
        EventBuilder::new("GET", "/recipes").query("limit", "500").build(),
    )
    .await;
    assert_eq!(response.status_code, 400);
    assert_eq!(problem(&response).type_uri, PROBLEM_INVALID_REQUEST);
}

#[tokio::test]
async fn unmatched_routes_are_not_found() {
    let (router, _store) = memory_router();
    let response = invoke(&router, EventBuilder::new("DELETE", "/recipes").build()).await;

    assert_eq!(response.status_code, 404);
    let problem = problem(&response);
    assert_eq!(problem.type_uri, PROBLEM_ROUTE_NOT_FOUND);
    assert_eq!(problem.instance.as_deref(), Some("lambda-request-id"));
}

#[tokio::test]
async fn legacy_events_are_served() {
    let (router, _store) = memory_router();
    let response = invoke(&router, EventBuilder::legacy("GET", "/recipes").build()).await;
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, "[]");
}

#[tokio::test]
async fn event_request_id_wins_over_lambda_context() {
    let (router, _store) = memory_router();
    let response = invoke(
        &router,
        EventBuilder::new("GET", "/recipes/missing")
            .request_id("gateway-id")
            .build(),
    )
    .await;
    assert_eq!(problem(&response).instance.as_deref(), Some("gateway-id"));
}

#[tokio::test]
async fn unreachable_store_is_service_unavailable() {
    let router = unreachable_router();

    let response = invoke(
        &router,
        EventBuilder::new("POST", "/recipes")
            .json_body(&recipe_json("Soup", &[]))
            .build(),
    )
    .await;
    assert_eq!(response.status_code, 503);
    assert_eq!(problem(&response).type_uri, PROBLEM_SERVICE_UNAVAILABLE);

    let response = invoke(&router, EventBuilder::new("DELETE", "/recipes").build()).await;
    assert_eq!(response.status_code, 404);
}

#[tokio::test]
async fn invalid_events_are_bad_requests() {
    let (router, _store) = memory_router();
    let response = handle_event(&router, json!({ "body": 42 }), "req-invalid")
        .await
        .expect("handled");
    assert_eq!(response.status_code, 400);
    let problem = problem(&response);
    assert_eq!(problem.type_uri, PROBLEM_INVALID_REQUEST);
    assert_eq!(problem.instance.as_deref(), Some("req-invalid"));
}

#[tokio::test]
async fn sqlite_backed_provider_serves_requests() {
    let provider = StoreProvider::new("test", StaticConfigSource::in_memory());
    let router = build_router(Arc::new(ApiContext::new(Arc::new(provider)))).expect("routes");

    let created = invoke(
        &router,
        EventBuilder::new("POST", "/recipes")
            .json_body(&recipe_json("Pizza Margherita", &["italien"]))
            .build(),
    )
    .await;
    assert_eq!(created.status_code, 201);
    let id = body_json(&created)["id"].as_str().unwrap().to_string();

    let fetched = invoke(
        &router,
        EventBuilder::new("GET", &format!("/recipes/{id}")).build(),
    )
    .await;
    assert_eq!(fetched.status_code, 200);
    assert_eq!(body_json(&fetched), body_json(&created));

    let listed = invoke(
        &router,
        EventBuilder::new("GET", "/recipes").query("tags", "italien").build(),
    )
    .await;
    assert_eq!(body_json(&listed).as_array().map(Vec::len), Some(1));
}
