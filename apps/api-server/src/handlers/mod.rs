//! HTTP handlers and route configuration.

mod categories;
mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
///
/// Public tier: health, category listing, post listing/count/slug lookup.
/// Protected tier: everything that takes an `Identity` extractor.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Post routes
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/count", web::get().to(posts::count))
                    .route("/me", web::get().to(posts::my_posts))
                    .route("/slug/{slug}", web::get().to(posts::get_by_slug))
                    .route("/{id}", web::get().to(posts::get_by_id))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete)),
            )
            // Category routes
            .service(
                web::scope("/categories")
                    .route("", web::get().to(categories::list))
                    .route("", web::post().to(categories::create))
                    .route("/{id}", web::put().to(categories::update))
                    .route("/{id}", web::delete().to(categories::delete)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test, web};
    use uuid::Uuid;

    use quill_core::ports::TokenService;
    use quill_infra::{JwtConfig, JwtTokenService};
    use quill_shared::dto::PostResponse;

    use crate::state::AppState;

    fn token_service() -> Arc<dyn TokenService> {
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "test-issuer".to_string(),
        }))
    }

    fn bearer(tokens: &Arc<dyn TokenService>, user_id: Uuid, name: &str) -> String {
        let token = tokens
            .generate_token(user_id, &format!("{name}@example.com"), name)
            .unwrap();
        format!("Bearer {token}")
    }

    #[actix_web::test]
    async fn test_protected_route_rejects_anonymous_caller() {
        let tokens = token_service();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::in_memory()))
                .app_data(web::Data::new(tokens))
                .configure(super::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(serde_json::json!({
                "title": "Hello World",
                "content": "body text"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_create_publish_and_fetch_flow() {
        let tokens = token_service();
        let author_id = Uuid::new_v4();
        let auth = bearer(&tokens, author_id, "alice");

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::in_memory()))
                .app_data(web::Data::new(tokens))
                .configure(super::configure_routes),
        )
        .await;

        // Create a draft.
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", auth.clone()))
            .set_json(serde_json::json!({
                "title": "Hello World",
                "content": "body text"
            }))
            .to_request();
        let post: PostResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(post.slug, "hello-world");
        assert!(!post.published);

        // Anonymous slug lookup misses the draft.
        let req = test::TestRequest::get()
            .uri("/api/posts/slug/hello-world")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);

        // Publish it.
        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header(("Authorization", auth))
            .set_json(serde_json::json!({ "published": true }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        // Now the anonymous lookup succeeds.
        let req = test::TestRequest::get()
            .uri("/api/posts/slug/hello-world")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }

    #[actix_web::test]
    async fn test_non_owner_update_is_forbidden() {
        let tokens = token_service();
        let owner = bearer(&tokens, Uuid::new_v4(), "alice");
        let intruder = bearer(&tokens, Uuid::new_v4(), "mallory");

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::in_memory()))
                .app_data(web::Data::new(tokens))
                .configure(super::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", owner))
            .set_json(serde_json::json!({
                "title": "Mine",
                "content": "body text"
            }))
            .to_request();
        let post: PostResponse = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header(("Authorization", intruder))
            .set_json(serde_json::json!({ "content": "overwritten" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);
    }

    #[actix_web::test]
    async fn test_validation_error_maps_to_422() {
        let tokens = token_service();
        let auth = bearer(&tokens, Uuid::new_v4(), "alice");

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::in_memory()))
                .app_data(web::Data::new(tokens))
                .configure(super::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(("Authorization", auth))
            .set_json(serde_json::json!({
                "title": "",
                "content": "body text"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 422);
    }
}
