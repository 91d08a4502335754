//! Admin product management.
//!
//! Hidden from anyone without the admin role claim. The remote service
//! authorizes these calls again on its side.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use reqwest::multipart::{Form, Part};
use tracing::instrument;

use frikibox_core::{Product, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Multipart field carrying the required front image.
const IMAGE_FIELD: &str = "imageUrl";

/// List every product.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Product>>> {
    state.api().products().await.map(Json).map_err(Into::into)
}

/// Create a product.
///
/// The form is passed through to the remote service field by field: text
/// fields (`name`, `description`, `imageHint`, `price`, `category`,
/// `availableSizes`, `tags`) and the image files `imageUrl` (required) and
/// `imageUrlBack`.
#[instrument(skip(state, admin, multipart), fields(user_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Product>)> {
    let mut form = Form::new();
    let mut has_image = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))?;

        let part = match file_name {
            Some(file_name) => {
                if data.is_empty() {
                    continue;
                }
                has_image |= name == IMAGE_FIELD;
                let part = Part::bytes(data.to_vec()).file_name(file_name);
                match content_type {
                    Some(mime) => part.mime_str(&mime).map_err(|_| {
                        AppError::BadRequest(format!("Invalid content type: {mime}"))
                    })?,
                    None => part,
                }
            }
            None => Part::text(
                String::from_utf8(data.to_vec())
                    .map_err(|_| AppError::BadRequest(format!("Field {name} is not text")))?,
            ),
        };
        form = form.part(name, part);
    }

    if !has_image {
        return Err(AppError::BadRequest("A product image is required".to_string()));
    }

    let product = state.api().create_product(form).await?;
    tracing::info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Delete a product.
#[instrument(skip(state, admin), fields(user_id = %admin.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = ProductId::from(id);
    state.api().delete_product(&id).await?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
