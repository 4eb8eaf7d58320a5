//! Category handlers - shared taxonomy, authenticated but unowned.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::service::{CreateCategoryInput, UpdateCategoryInput};
use quill_shared::ApiResponse;
use quill_shared::dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories - public, unpaginated, with post counts.
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.content.list_categories().await?;

    let body: Vec<CategoryResponse> = categories.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/categories
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateCategoryRequest>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let principal = identity.into_principal();

    let input = CreateCategoryInput {
        name: req.name,
        description: req.description,
    };

    let category = state.content.create_category(input, &principal).await?;
    Ok(HttpResponse::Created().json(CategoryResponse::from(category)))
}

/// PUT /api/categories/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCategoryRequest>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let principal = identity.into_principal();

    let input = UpdateCategoryInput {
        name: req.name,
        description: req.description,
    };

    let category = state
        .content
        .update_category(path.into_inner(), input, &principal)
        .await?;
    Ok(HttpResponse::Ok().json(CategoryResponse::from(category)))
}

/// DELETE /api/categories/{id}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let principal = identity.into_principal();
    state
        .content
        .delete_category(path.into_inner(), &principal)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message((), "category deleted")))
}
