//! Post handlers: create, list, update, delete, like, comment.

use actix_web::{HttpResponse, web};

use murmur_core::DomainError;
use murmur_core::domain::{self, Post, User};
use murmur_shared::ApiResponse;
use murmur_shared::dto::{
    CommentRequest, CommentResponse, CreatePostRequest, ListPostsQuery, PostResponse,
    UpdatePostRequest,
};

use crate::handlers::parse_id;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        author_id: post.author_id.to_string(),
        author_username: post.author_username,
        content: post.content,
        is_public: post.is_public,
        likes: post.likes.iter().map(|id| id.to_string()).collect(),
        comments: post
            .comments
            .into_iter()
            .map(|c| CommentResponse {
                author_id: c.author_id.to_string(),
                author_username: c.author_username,
                text: c.text,
                created_at: c.created_at.to_rfc3339(),
            })
            .collect(),
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    }
}

/// Resolve the caller to a full user record, for operations that snapshot
/// the username. A token whose user no longer exists grants nothing.
async fn caller(state: &AppState, identity: Identity) -> Result<User, AppError> {
    state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let content = domain::validate_content(&req.content)?;
    let author = caller(&state, identity).await?;

    let post = Post::new(
        author.id,
        author.username,
        content,
        req.is_public.unwrap_or(true),
    );
    let saved = state.posts.save(post).await?;

    tracing::debug!(post_id = %saved.id, "Post created");

    Ok(HttpResponse::Created().json(post_response(saved)))
}

/// GET /api/posts
pub async fn list_public(
    state: web::Data<AppState>,
    _identity: Identity,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);

    let posts = state.posts.find_public(limit, offset).await?;

    Ok(HttpResponse::Ok().json(posts.into_iter().map(post_response).collect::<Vec<_>>()))
}

/// GET /api/posts/user/{id}
///
/// A user sees all of their own posts; everyone else sees only the public
/// ones.
pub async fn list_by_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let target = parse_id(&path)?;
    let include_private = target == identity.user_id;

    let posts = state.posts.find_by_author(target, include_private).await?;

    Ok(HttpResponse::Ok().json(posts.into_iter().map(post_response).collect::<Vec<_>>()))
}

/// GET /api/posts/{id}
///
/// A private post is served only to its author; for anyone else it does not
/// exist.
pub async fn get_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", id))?;

    if !post.is_visible_to(identity.user_id) {
        return Err(DomainError::not_found("post", id).into());
    }

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let req = body.into_inner();

    // Validate before touching the store.
    let content = match req.content.as_deref() {
        Some(raw) => Some(domain::validate_content(raw)?),
        None => None,
    };

    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", id))?;
    post.ensure_author(identity.user_id)?;

    if let Some(content) = content {
        post.content = content;
    }
    if let Some(is_public) = req.is_public {
        post.is_public = is_public;
    }
    post.updated_at = chrono::Utc::now();

    let saved = state.posts.save(post).await?;

    Ok(HttpResponse::Ok().json(post_response(saved)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", id))?;
    post.ensure_author(identity.user_id)?;

    state.posts.delete(id).await?;

    tracing::debug!(post_id = %id, "Post deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::message("Post deleted")))
}

/// PUT /api/posts/{id}/like
///
/// Idempotent toggle: likes when the caller hasn't liked yet, unlikes
/// otherwise.
pub async fn toggle_like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;

    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", id))?;

    let liked = post.toggle_like(identity.user_id);
    let saved = state.posts.save(post).await?;

    tracing::debug!(post_id = %id, liked, "Like toggled");

    Ok(HttpResponse::Ok().json(post_response(saved)))
}

/// POST /api/posts/{id}/comments
pub async fn comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;

    let text = domain::validate_comment_text(&body.text)?;
    let commenter = caller(&state, identity).await?;

    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", id))?;

    post.add_comment(commenter.id, commenter.username, text);
    let saved = state.posts.save(post).await?;

    Ok(HttpResponse::Ok().json(post_response(saved)))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::header, test, web};
    use murmur_core::domain::User;
    use murmur_shared::dto::PostResponse;
    use serde_json::json;

    use crate::handlers::{configure_routes, testing};
    use crate::state::AppState;

    async fn seed_user(state: &AppState, username: &str) -> User {
        let user = User::new(
            username.to_string(),
            format!("{username}@example.com"),
            "not-a-real-hash".to_string(),
        );
        state.users.save(user).await.unwrap()
    }

    fn bearer(token: &str) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn test_create_requires_auth() {
        let state = testing::state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .app_data(web::Data::new(testing::token_service()))
                .app_data(web::Data::new(testing::password_service()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({"content": "hello"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_create_and_list_public() {
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

        let alice = seed_user(&state, "alice").await;
        let bob = seed_user(&state, "bob").await;
        let alice_token = tokens.generate_token(alice.id).unwrap();
        let bob_token = tokens.generate_token(bob.id).unwrap();

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&alice_token))
            .set_json(json!({"content": "  hello world  "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let created: PostResponse = test::read_body_json(resp).await;
        assert_eq!(created.content, "hello world");
        assert_eq!(created.author_username, "alice");
        assert!(created.is_public);

        // Another authenticated user sees it in the public feed.
        let req = test::TestRequest::get()
            .uri("/api/posts")
            .insert_header(bearer(&bob_token))
            .to_request();
        let feed: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, created.id);
    }

    #[actix_web::test]
    async fn test_content_length_limits() {
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

        let alice = seed_user(&state, "alice").await;
        let token = tokens.generate_token(alice.id).unwrap();

        // Exactly at the limit passes.
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .set_json(json!({"content": "x".repeat(5000)}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 201);

        // One character over fails.
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .set_json(json!({"content": "x".repeat(5001)}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);

        // Whitespace-only fails.
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .set_json(json!({"content": "   "}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);
    }

    #[actix_web::test]
    async fn test_private_post_visibility() {
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

        let alice = seed_user(&state, "alice").await;
        let bob = seed_user(&state, "bob").await;
        let alice_token = tokens.generate_token(alice.id).unwrap();
        let bob_token = tokens.generate_token(bob.id).unwrap();

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&alice_token))
            .set_json(json!({"content": "my diary", "is_public": false}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 201);

        // Bob's view of Alice's profile: no private posts.
        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/user/{}", alice.id))
            .insert_header(bearer(&bob_token))
            .to_request();
        let bob_view: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
        assert!(bob_view.is_empty());

        // The public feed doesn't show it either.
        let req = test::TestRequest::get()
            .uri("/api/posts")
            .insert_header(bearer(&bob_token))
            .to_request();
        let feed: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
        assert!(feed.is_empty());

        // Alice sees her own private post.
        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/user/{}", alice.id))
            .insert_header(bearer(&alice_token))
            .to_request();
        let own_view: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(own_view.len(), 1);
        assert_eq!(own_view[0].content, "my diary");

        // Fetching it directly: the author gets it, anyone else a 404.
        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", own_view[0].id))
            .insert_header(bearer(&alice_token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", own_view[0].id))
            .insert_header(bearer(&bob_token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }

    #[actix_web::test]
    async fn test_update_is_author_only() {
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

        let alice = seed_user(&state, "alice").await;
        let bob = seed_user(&state, "bob").await;
        let alice_token = tokens.generate_token(alice.id).unwrap();
        let bob_token = tokens.generate_token(bob.id).unwrap();

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&alice_token))
            .set_json(json!({"content": "original"}))
            .to_request();
        let created: PostResponse = test::call_and_read_body_json(&app, req).await;

        // Non-author gets 403, public or not.
        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", created.id))
            .insert_header(bearer(&bob_token))
            .set_json(json!({"content": "hijacked"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 403);

        // The author can change content and visibility.
        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", created.id))
            .insert_header(bearer(&alice_token))
            .set_json(json!({"content": "edited", "is_public": false}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let updated: PostResponse = test::read_body_json(resp).await;
        assert_eq!(updated.content, "edited");
        assert!(!updated.is_public);
        assert_eq!(updated.created_at, created.created_at);
        assert_ne!(updated.updated_at, created.updated_at);
    }

    #[actix_web::test]
    async fn test_delete_is_author_only() {
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

        let alice = seed_user(&state, "alice").await;
        let bob = seed_user(&state, "bob").await;
        let alice_token = tokens.generate_token(alice.id).unwrap();
        let bob_token = tokens.generate_token(bob.id).unwrap();

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&alice_token))
            .set_json(json!({"content": "ephemeral"}))
            .to_request();
        let created: PostResponse = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", created.id))
            .insert_header(bearer(&bob_token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 403);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", created.id))
            .insert_header(bearer(&alice_token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);

        // Gone now.
        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", created.id))
            .insert_header(bearer(&alice_token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }

    #[actix_web::test]
    async fn test_toggle_like_twice_restores_state() {
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

        let alice = seed_user(&state, "alice").await;
        let bob = seed_user(&state, "bob").await;
        let alice_token = tokens.generate_token(alice.id).unwrap();
        let bob_token = tokens.generate_token(bob.id).unwrap();

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&alice_token))
            .set_json(json!({"content": "like me"}))
            .to_request();
        let created: PostResponse = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}/like", created.id))
            .insert_header(bearer(&bob_token))
            .to_request();
        let liked: PostResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(liked.likes, vec![bob.id.to_string()]);

        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}/like", created.id))
            .insert_header(bearer(&bob_token))
            .to_request();
        let unliked: PostResponse = test::call_and_read_body_json(&app, req).await;
        assert!(unliked.likes.is_empty());
    }

    #[actix_web::test]
    async fn test_comment_validation_and_order() {
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

        let alice = seed_user(&state, "alice").await;
        let bob = seed_user(&state, "bob").await;
        let alice_token = tokens.generate_token(alice.id).unwrap();
        let bob_token = tokens.generate_token(bob.id).unwrap();

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&alice_token))
            .set_json(json!({"content": "discuss"}))
            .to_request();
        let created: PostResponse = test::call_and_read_body_json(&app, req).await;
        let comments_uri = format!("/api/posts/{}/comments", created.id);

        // Empty and oversized comments are rejected.
        let req = test::TestRequest::post()
            .uri(&comments_uri)
            .insert_header(bearer(&bob_token))
            .set_json(json!({"text": "   "}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);

        let req = test::TestRequest::post()
            .uri(&comments_uri)
            .insert_header(bearer(&bob_token))
            .set_json(json!({"text": "y".repeat(1001)}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);

        // Valid comments append in order.
        let req = test::TestRequest::post()
            .uri(&comments_uri)
            .insert_header(bearer(&bob_token))
            .set_json(json!({"text": "first"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);

        let req = test::TestRequest::post()
            .uri(&comments_uri)
            .insert_header(bearer(&alice_token))
            .set_json(json!({"text": "second"}))
            .to_request();
        let with_comments: PostResponse = test::call_and_read_body_json(&app, req).await;

        let texts: Vec<&str> = with_comments
            .comments
            .iter()
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(with_comments.comments[0].author_username, "bob");
        assert_eq!(with_comments.comments[1].author_username, "alice");
    }

    #[actix_web::test]
    async fn test_malformed_id_is_rejected_before_lookup() {
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

        let alice = seed_user(&state, "alice").await;
        let token = tokens.generate_token(alice.id).unwrap();

        // Not a UUID: 400, distinct from an unknown id.
        let req = test::TestRequest::put()
            .uri("/api/posts/not-a-uuid")
            .insert_header(bearer(&token))
            .set_json(json!({"content": "x"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);

        // Well-formed but unknown: 404.
        let req = test::TestRequest::put()
            .uri(&format!("/api/posts/{}", uuid::Uuid::new_v4()))
            .insert_header(bearer(&token))
            .set_json(json!({"content": "x"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }

    #[actix_web::test]
    async fn test_list_pagination_clamps() {
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

        let alice = seed_user(&state, "alice").await;
        let token = tokens.generate_token(alice.id).unwrap();

        for i in 0..3 {
            let req = test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(bearer(&token))
                .set_json(json!({"content": format!("post {i}")}))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), 201);
        }

        // limit=0 clamps up to 1.
        let req = test::TestRequest::get()
            .uri("/api/posts?limit=0")
            .insert_header(bearer(&token))
            .to_request();
        let one: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(one.len(), 1);

        // An offset past the end yields an empty page.
        let req = test::TestRequest::get()
            .uri("/api/posts?offset=10")
            .insert_header(bearer(&token))
            .to_request();
        let empty: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
        assert!(empty.is_empty());
    }
}
