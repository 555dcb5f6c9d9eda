mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use uuid::Uuid;

use ugc_service::handlers;

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .service(handlers::api_scope(common::verifier()))
                // `test::call_service` panics on service-level errors; render
                // them into responses the way the HTTP server does so the
                // status assertions can observe the middleware's 403.
                .wrap_fn(|req, srv| {
                    let fut = actix_web::dev::Service::call(srv, req);
                    async move {
                        Ok(match fut.await {
                            Ok(res) => res.map_into_left_body(),
                            // Cloning the live request here would break
                            // routing (it needs sole ownership), so pair the
                            // rendered error with a placeholder request.
                            Err(err) => actix_web::dev::ServiceResponse::new(
                                test::TestRequest::default().to_http_request(),
                                actix_web::HttpResponse::from_error(err).map_into_right_body(),
                            ),
                        })
                    }
                }),
        )
        .await
    };
}

#[actix_web::test]
async fn protected_route_accepts_valid_token() {
    let state = common::state();
    let app = app!(state);

    let user_id = Uuid::new_v4();
    let film_id = Uuid::new_v4();
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/films/{film_id}"))
        .insert_header((
            "Authorization",
            format!("Bearer {}", common::token_for(user_id)),
        ))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn protected_route_rejects_missing_token() {
    let state = common::state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/users/my_account")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn protected_route_rejects_garbage_token() {
    let state = common::state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/users/my_account")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn protected_route_rejects_expired_token() {
    let state = common::state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/users/my_account")
        .insert_header((
            "Authorization",
            format!("Bearer {}", common::expired_token(Uuid::new_v4())),
        ))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn protected_route_rejects_basic_scheme() {
    let state = common::state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/films/{}/add_like", Uuid::new_v4()))
        .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn public_routes_need_no_token() {
    let state = common::state();
    let app = app!(state);

    for uri in [
        "/api/v1/likes".to_string(),
        format!("/api/v1/likes/{}", Uuid::new_v4()),
        format!("/api/v1/reviews/{}", Uuid::new_v4()),
        format!("/api/v1/reviews/film/{}", Uuid::new_v4()),
        format!("/api/v1/users/{}", Uuid::new_v4()),
    ] {
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    }
}
