//! Public care-category listing.

use crate::error::{api_success, ApiError, ApiResponse};
use crate::models::Category;
use crate::server::CareLinkServer;
use crate::storage::CategoryStore;
use axum::{extract::State, Json};

/// All care categories, ordered by name
pub async fn list_categories(
    State(server): State<CareLinkServer>,
) -> Result<Json<ApiResponse<Vec<Category>>>, ApiError> {
    let categories = server.categories.list().await?;
    Ok(Json(api_success(categories)))
}
