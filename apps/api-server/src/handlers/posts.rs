//! Post handlers - the public and protected post surfaces.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::service::{CreatePostInput, PostQuery, UpdatePostInput};
use quill_shared::ApiResponse;
use quill_shared::dto::{
    CountResponse, CreatePostRequest, ListPostsParams, PostDetailResponse, PostResponse,
    UpdatePostRequest,
};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u64 = 20;

fn to_query(params: &ListPostsParams) -> PostQuery {
    PostQuery {
        published: params.published,
        category_id: params.category_id,
        author_id: params.author_id,
        search: params.search.clone(),
    }
}

/// GET /api/posts - public listing with filters and pagination.
pub async fn list(
    state: web::Data<AppState>,
    params: web::Query<ListPostsParams>,
) -> AppResult<HttpResponse> {
    let params = params.into_inner();
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let offset = params.offset.unwrap_or(0);

    let posts = state
        .content
        .list_posts(&to_query(&params), limit, offset)
        .await?;

    let body: Vec<PostResponse> = posts.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/posts/count - same filters as list, count only.
pub async fn count(
    state: web::Data<AppState>,
    params: web::Query<ListPostsParams>,
) -> AppResult<HttpResponse> {
    let count = state.content.count_posts(&to_query(&params)).await?;

    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

/// GET /api/posts/slug/{slug} - public lookup, drafts visible to their author.
pub async fn get_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let principal = identity.into_principal();

    let detail = state
        .content
        .get_post_by_slug(&slug, principal.as_ref())
        .await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse::from(detail)))
}

/// GET /api/posts/me - all of the caller's own posts, any state.
pub async fn my_posts(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let principal = identity.into_principal();
    let posts = state.content.get_user_posts(&principal).await?;

    let body: Vec<PostResponse> = posts.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/posts/{id} - ownership-gated, used for edit-form hydration.
pub async fn get_by_id(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let principal = identity.into_principal();
    let detail = state.content.get_post(path.into_inner(), &principal).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse::from(detail)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let principal = identity.into_principal();

    let input = CreatePostInput {
        title: req.title,
        content: req.content,
        cover_image: req.cover_image,
        excerpt: req.excerpt,
        published: req.published,
        category_ids: req.category_ids,
    };

    let post = state.content.create_post(input, &principal).await?;
    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let principal = identity.into_principal();

    let input = UpdatePostInput {
        title: req.title,
        content: req.content,
        cover_image: req.cover_image,
        excerpt: req.excerpt,
        published: req.published,
        archived: req.archived,
        category_ids: req.category_ids,
    };

    let post = state
        .content
        .update_post(path.into_inner(), input, &principal)
        .await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let principal = identity.into_principal();
    state
        .content
        .delete_post(path.into_inner(), &principal)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message((), "post deleted")))
}
