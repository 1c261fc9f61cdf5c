//! The appointment booking workflow.
//!
//! Validation runs before any side effect. The appointment row is
//! persisted unconfirmed, the notifier is invoked exactly once, and only a
//! successful delivery flips `is_confirmed`. A delivery failure is
//! surfaced to the caller but never rolls back the booking: booking
//! durability takes priority over notification.

use crate::models::{Appointment, Category, TimeSlot};
use crate::storage::{AppointmentStore, CategoryStore};
use chrono::{NaiveDate, Utc};
use email_notify::Notifier;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// An unvalidated booking request as received from the client.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub category_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub notes: Option<String>,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// One of the fixed hourly slots, e.g. `"09:00"`
    pub time: String,
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },

    #[error("category not found")]
    CategoryNotFound,

    #[error("appointment {appointment_id} booked but confirmation failed: {reason}")]
    NotificationFailed {
        appointment_id: Uuid,
        reason: String,
    },

    #[error("storage error: {0}")]
    Store(#[from] anyhow::Error),
}

/// Drives a booking request through validation, persistence, and the
/// confirmation state machine.
pub struct BookingService {
    categories: Arc<dyn CategoryStore>,
    appointments: Arc<dyn AppointmentStore>,
    notifier: Arc<dyn Notifier>,
}

impl BookingService {
    pub fn new(
        categories: Arc<dyn CategoryStore>,
        appointments: Arc<dyn AppointmentStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            categories,
            appointments,
            notifier,
        }
    }

    pub async fn book(&self, request: BookingRequest) -> Result<Appointment, BookingError> {
        let (date, time) = validate(&request)?;

        let category = self
            .categories
            .find_by_id(request.category_id)
            .await?
            .ok_or(BookingError::CategoryNotFound)?;

        let mut appointment = Appointment {
            id: Uuid::new_v4(),
            category_id: category.id,
            full_name: request.full_name,
            email: request.email,
            phone_number: request.phone_number,
            notes: request.notes,
            date,
            time,
            is_confirmed: false,
            created_at: Utc::now(),
        };
        self.appointments.insert(&appointment).await?;

        // The row is durable before any network I/O happens
        let body = render_confirmation(&appointment, &category);
        match self
            .notifier
            .notify(&appointment.email, "Appointment Confirmation", &body)
            .await
        {
            Ok(message_id) => {
                self.appointments.mark_confirmed(appointment.id).await?;
                appointment.is_confirmed = true;
                tracing::info!(
                    appointment_id = %appointment.id,
                    message_id = %message_id,
                    "appointment booked and confirmed"
                );
                Ok(appointment)
            }
            Err(err) => {
                tracing::warn!(
                    appointment_id = %appointment.id,
                    error = %err,
                    "confirmation delivery failed, appointment kept unconfirmed"
                );
                Err(BookingError::NotificationFailed {
                    appointment_id: appointment.id,
                    reason: err.to_string(),
                })
            }
        }
    }
}

fn validate(request: &BookingRequest) -> Result<(NaiveDate, TimeSlot), BookingError> {
    if request.full_name.trim().is_empty() {
        return Err(BookingError::Validation {
            field: "full_name",
            reason: "must not be empty".to_string(),
        });
    }

    let time: TimeSlot = request.time.parse().map_err(|_| BookingError::Validation {
        field: "time",
        reason: format!(
            "must be one of the hourly slots {} through {}",
            TimeSlot::Nine,
            TimeSlot::Seventeen
        ),
    })?;

    let date = NaiveDate::parse_from_str(&request.date, "%Y-%m-%d").map_err(|_| {
        BookingError::Validation {
            field: "date",
            reason: "must be a calendar date formatted YYYY-MM-DD".to_string(),
        }
    })?;

    if !is_plausible_email(&request.email) {
        return Err(BookingError::Validation {
            field: "email",
            reason: "must contain '@' followed by a domain with a '.'".to_string(),
        });
    }

    Ok((date, time))
}

/// Intentionally permissive: an `@` with at least one `.` somewhere after
/// it. Deliberately not a full address grammar; the mail transport is the
/// real arbiter of deliverability.
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((_, domain)) => domain.contains('.'),
        None => false,
    }
}

fn render_confirmation(appointment: &Appointment, category: &Category) -> String {
    format!(
        "Hello {},\n\n\
         Your appointment for {} has been scheduled.\n\n\
         Date: {}\n\
         Time: {}\n\
         Category: {}\n\n\
         Thank you!",
        appointment.full_name, category.name, appointment.date, appointment.time, category.name,
    )
}
