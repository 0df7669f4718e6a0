// src/errors.rs

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Błąd sieci podczas komunikacji z serwisem produktów: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Serwis produktów zwrócił błąd (status: {status})")]
    ServerFailure {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Nie można przetworzyć odpowiedzi serwisu produktów: {0}")]
    InvalidResponse(String),

    #[error("Nieprawidłowa cena: '{0}'")]
    InvalidPrice(String),

    #[error("Błędy walidacji")]
    ValidationError(#[from] ValidationErrors),

    #[error("Nie znaleziono zasobu")]
    NotFound,

    #[error("Nieprawidłowe dane wejściowe: {0}")]
    UnprocessableEntity(String),

    #[error("Błąd konfiguracji: {0}")]
    Config(String),
}

impl AppError {
    /// Błędy, które użytkownik może poprawić w formularzu.
    pub fn is_draft_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidPrice(_) | AppError::ValidationError(_)
        )
    }

    /// Komunikat pokazywany nad formularzem.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidPrice(raw) => {
                format!("Price must be a non-negative number (got '{}')", raw)
            }
            AppError::ValidationError(errors) => {
                let mut fields: Vec<String> = errors
                    .field_errors()
                    .keys()
                    .map(|field| field.to_string())
                    .collect();
                fields.sort_unstable();
                format!("Invalid value in: {}", fields.join(", "))
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NetworkFailure(err) => {
                tracing::error!("Błąd sieci: {:?}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    "Serwis produktów jest niedostępny".to_string(),
                )
            }
            AppError::ServerFailure { status, body } => {
                tracing::error!("Serwis produktów: Status={}, Treść={}", status, body);
                (
                    StatusCode::BAD_GATEWAY,
                    format!("Serwis produktów zwrócił błąd (status: {})", status),
                )
            }
            AppError::InvalidResponse(message) => (StatusCode::BAD_GATEWAY, message),
            AppError::InvalidPrice(raw) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Nieprawidłowa cena: '{}'", raw),
            ),
            AppError::ValidationError(errors) => {
                let mut messages = Vec::new();
                for (field, field_errors) in errors.field_errors() {
                    for error in field_errors {
                        let msg = error.message.as_ref().map_or_else(
                            || format!("Pole '{}' jest nieprawidłowe", field),
                            |m| format!("Pole '{}': {}", field, m),
                        );
                        messages.push(msg);
                    }
                }
                (StatusCode::UNPROCESSABLE_ENTITY, messages.join("; "))
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "Nie znaleziono zasobu".to_string()),
            AppError::UnprocessableEntity(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::Config(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        tracing::error!("Błąd przetwarzania Multipart: {:?}", err);
        AppError::UnprocessableEntity(format!("Błąd przetwarzania danych formularza: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_errors_are_draft_errors() {
        assert!(AppError::InvalidPrice("abc".into()).is_draft_error());
        assert!(!AppError::NotFound.is_draft_error());
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = AppError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_price_maps_to_422() {
        let response = AppError::InvalidPrice("ten".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
