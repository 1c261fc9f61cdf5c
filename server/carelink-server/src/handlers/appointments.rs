//! Public appointment booking.

use crate::error::{api_success, ApiError, ApiResponse};
use crate::models::Appointment;
use crate::server::CareLinkServer;
use crate::services::booking::BookingRequest;
use axum::{extract::State, http::StatusCode, Json};

/// Book an appointment and trigger the confirmation notification
pub async fn create_appointment(
    State(server): State<CareLinkServer>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Appointment>>), ApiError> {
    let appointment = server.booking.book(request).await?;
    Ok((StatusCode::CREATED, Json(api_success(appointment))))
}
