//! User profile handlers.

use actix_web::{HttpResponse, web};

use murmur_core::DomainError;
use murmur_core::domain::User;
use murmur_shared::dto::UserResponse;

use crate::handlers::parse_id;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// A profile as exposed by the API; the password hash never leaves the store.
pub(super) fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        username: user.username.clone(),
        email: user.email.clone(),
        created_at: user.created_at.to_rfc3339(),
    }
}

/// GET /api/users/{id}
pub async fn get_user(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;

    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("user", id))?;

    Ok(HttpResponse::Ok().json(user_response(&user)))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::header, test, web};
    use murmur_core::domain::User;
    use murmur_shared::dto::UserResponse;

    use crate::handlers::{configure_routes, testing};

    #[actix_web::test]
    async fn test_get_user_profile() {
        let state = testing::state();
        let tokens = testing::token_service();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .app_data(web::Data::new(tokens.clone()))
                .app_data(web::Data::new(testing::password_service()))
                .configure(configure_routes),
        )
        .await;

        let alice = state
            .users
            .save(User::new(
                "alice".to_string(),
                "alice@example.com".to_string(),
                "hash".to_string(),
            ))
            .await
            .unwrap();
        let token = tokens.generate_token(alice.id).unwrap();
        let auth = (header::AUTHORIZATION, format!("Bearer {token}"));

        let req = test::TestRequest::get()
            .uri(&format!("/api/users/{}", alice.id))
            .insert_header(auth.clone())
            .to_request();
        let profile: UserResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(profile.username, "alice");

        // Malformed id is 400; a well-formed unknown id is 404.
        let req = test::TestRequest::get()
            .uri("/api/users/not-a-uuid")
            .insert_header(auth.clone())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);

        let req = test::TestRequest::get()
            .uri(&format!("/api/users/{}", uuid::Uuid::new_v4()))
            .insert_header(auth)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }
}
