// src/htmx_handlers.rs

use std::collections::HashMap;

use axum::extract::{Multipart, Path, State};
use maud::Markup;

use crate::{
    errors::AppError,
    models::{FormInput, PickedImage},
    state::AppState,
    views::{render_page, render_product_list, render_screen},
};

const IMAGE_FIELD: &str = "image";

async fn render_current_screen(app_state: &AppState) -> Markup {
    render_screen(&app_state.manager.snapshot().await)
}

/// Otwarcie ekranu: jednorazowe pobranie listy i pełna strona.
pub async fn serve_index(State(app_state): State<AppState>) -> Markup {
    tracing::info!("Obsłużono zapytanie GET / - otwarcie ekranu produktów");
    app_state.manager.load().await.ok();
    render_page(&app_state.manager.snapshot().await)
}

pub async fn refresh_products_htmx_handler(State(app_state): State<AppState>) -> Markup {
    tracing::info!("HTMX: odświeżanie listy produktów");
    app_state.manager.load().await.ok();
    render_product_list(&app_state.manager.snapshot().await.rows)
}

pub async fn start_create_htmx_handler(State(app_state): State<AppState>) -> Markup {
    app_state.manager.start_create().await;
    render_current_screen(&app_state).await
}

pub async fn start_edit_htmx_handler(
    State(app_state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Markup, AppError> {
    tracing::info!("HTMX: edycja produktu o ID: {}", product_id);
    app_state.manager.start_edit(&product_id).await?;
    Ok(render_current_screen(&app_state).await)
}

pub async fn cancel_form_htmx_handler(State(app_state): State<AppState>) -> Markup {
    app_state.manager.cancel().await;
    render_current_screen(&app_state).await
}

pub async fn submit_form_htmx_handler(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Markup, AppError> {
    let mut text_fields: HashMap<String, String> = HashMap::new();
    let mut picked_image: Option<PickedImage> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = match field.name() {
            Some(name) => name.to_string(),
            None => {
                tracing::warn!("Odebrano pole multipart bez nazwy, pomijam");
                continue;
            }
        };

        if field_name == IMAGE_FIELD {
            let file_name = field
                .file_name()
                .filter(|name| !name.is_empty())
                .map(|name| name.to_string());
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await?;

            match file_name {
                Some(file_name) if !bytes.is_empty() => {
                    tracing::info!(
                        "Odebrano obraz: {}, rozmiar: {} bajtów",
                        file_name,
                        bytes.len()
                    );
                    picked_image = Some(PickedImage {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                _ => tracing::debug!("Puste pole obrazu, pomijam"),
            }
        } else {
            let value = field.text().await?;
            text_fields.insert(field_name, value);
        }
    }

    let mut text = |key: &str| text_fields.remove(key).unwrap_or_default();
    let input = FormInput {
        name: text("name"),
        description: text("description"),
        price: text("price"),
        image: picked_image,
    };

    match app_state.manager.submit_form(input).await {
        Ok(outcome) => tracing::info!("Wynik wysłania formularza: {}", outcome),
        Err(e) if e.is_draft_error() => {
            tracing::warn!("Formularz wymaga poprawy: {}", e)
        }
        Err(e) => tracing::error!("Nie udało się zapisać produktu: {}", e),
    }

    Ok(render_current_screen(&app_state).await)
}

pub async fn delete_product_htmx_handler(
    State(app_state): State<AppState>,
    Path(product_id): Path<String>,
) -> Markup {
    tracing::info!("HTMX: usuwanie produktu o ID: {}", product_id);
    app_state.manager.delete(&product_id).await.ok();
    render_current_screen(&app_state).await
}
