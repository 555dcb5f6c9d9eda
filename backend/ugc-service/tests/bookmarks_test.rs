mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use serde_json::Value;
use uuid::Uuid;

use ugc_service::handlers;

macro_rules! get_json {
    ($app:expr, $uri:expr, $token:expr) => {{
        let req = test::TestRequest::get()
            .uri(&$uri)
            .insert_header(("Authorization", format!("Bearer {}", $token)))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        body
    }};
}

#[actix_web::test]
async fn add_bookmark_shows_up_in_account_and_film_view() {
    let state = common::state();
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .service(handlers::api_scope(common::verifier())),
    )
    .await;

    let user_id = Uuid::new_v4();
    let film_id = Uuid::new_v4();
    let token = common::token_for(user_id);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/users/bookmarks/add/{film_id}?timestamp=42"))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let account = get_json!(app, "/api/v1/users/my_account", token);
    let bookmarks = account["bookmarks"].as_array().unwrap();
    assert_eq!(bookmarks.len(), 1);
    assert_eq!(bookmarks[0]["obj_id"], film_id.to_string().as_str());
    assert_eq!(bookmarks[0]["timestamp"], 42);

    let film = get_json!(app, format!("/api/v1/films/{film_id}"), token);
    assert_eq!(film["bookmark"]["user_id"], user_id.to_string().as_str());
}

#[actix_web::test]
async fn readding_bookmark_replaces_timestamp() {
    let state = common::state();
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .service(handlers::api_scope(common::verifier())),
    )
    .await;

    let film_id = Uuid::new_v4();
    let token = common::token_for(Uuid::new_v4());

    for timestamp in [0, 300] {
        let req = test::TestRequest::post()
            .uri(&format!(
                "/api/v1/users/bookmarks/add/{film_id}?timestamp={timestamp}"
            ))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );
    }

    let film = get_json!(app, format!("/api/v1/films/{film_id}"), token);
    assert_eq!(film["bookmark"]["timestamp"], 300);

    let account = get_json!(app, "/api/v1/users/my_account", token);
    assert_eq!(account["bookmarks"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn remove_bookmark_clears_it_everywhere() {
    let state = common::state();
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .service(handlers::api_scope(common::verifier())),
    )
    .await;

    let film_id = Uuid::new_v4();
    let token = common::token_for(Uuid::new_v4());

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/users/bookmarks/add/{film_id}"))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/users/bookmarks/remove/{film_id}"))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let film = get_json!(app, format!("/api/v1/films/{film_id}"), token);
    assert_eq!(film["bookmark"], Value::Null);

    let account = get_json!(app, "/api/v1/users/my_account", token);
    assert!(account["bookmarks"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn bookmarks_are_scoped_per_user() {
    let state = common::state();
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .service(handlers::api_scope(common::verifier())),
    )
    .await;

    let film_id = Uuid::new_v4();
    let owner = common::token_for(Uuid::new_v4());
    let other = common::token_for(Uuid::new_v4());

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/users/bookmarks/add/{film_id}"))
        .insert_header(("Authorization", format!("Bearer {owner}")))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let film = get_json!(app, format!("/api/v1/films/{film_id}"), other);
    assert_eq!(film["bookmark"], Value::Null);

    let account = get_json!(app, "/api/v1/users/my_account", other);
    assert!(account["bookmarks"].as_array().unwrap().is_empty());
}
