// src/models.rs
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use validator::Validate;

use crate::errors::AppError;

/// Produkt w postaci zwracanej przez serwis produktów.
/// Identyfikator nadaje serwer; klient używa go tylko jako klucza.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
}

/// Obraz wybrany przez użytkownika, jeszcze nie wysłany.
#[derive(Clone, PartialEq)]
pub struct PickedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for PickedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickedImage")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Tryb ekranu: lista, dodawanie albo edycja konkretnego produktu.
#[derive(Debug, Clone, PartialEq, Eq, Default, Display)]
pub enum ScreenMode {
    #[default]
    Browsing,
    Creating,
    Editing(String),
}

impl ScreenMode {
    pub fn form_visible(&self) -> bool {
        !matches!(self, ScreenMode::Browsing)
    }

    pub fn edit_target(&self) -> Option<&str> {
        match self {
            ScreenMode::Editing(id) => Some(id.as_str()),
            _ => None,
        }
    }
}

/// Szkic formularza. Cena trzymana jest jako tekst wpisany przez użytkownika.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: Option<PickedImage>,
}

/// Dane formularza odebrane w jednym żądaniu wysłania.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: Option<PickedImage>,
}

impl ProductDraft {
    /// Wypełnia szkic danymi produktu do edycji. Obraz nie jest przenoszony.
    pub fn from_product(product: &Product) -> Self {
        ProductDraft {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            image: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.description.trim().is_empty()
            && !self.price.trim().is_empty()
    }

    pub fn parse_price(&self) -> Result<f64, AppError> {
        let raw = self.price.trim();
        match raw.parse::<f64>() {
            Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
            _ => Err(AppError::InvalidPrice(raw.to_string())),
        }
    }

    /// Buduje zwalidowane dane do wysłania.
    pub fn to_submission(&self) -> Result<ProductSubmission, AppError> {
        let payload = ProductPayload {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self.parse_price()?,
        };
        payload.validate()?;

        Ok(ProductSubmission {
            payload,
            image: self.image.clone(),
        })
    }
}

/// Pola tekstowe wysyłane do serwisu (JSON albo pola multipart).
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct ProductPayload {
    #[validate(length(min = 1, max = 255, message = "Nazwa jest wymagana"))]
    pub name: String,

    #[validate(length(min = 1, max = 5000, message = "Opis jest wymagany"))]
    pub description: String,

    #[validate(range(min = 0.0, message = "Cena nie może być ujemna"))]
    pub price: f64,
}

/// Kompletne żądanie zapisu: pola tekstowe i opcjonalny obraz.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSubmission {
    pub payload: ProductPayload,
    pub image: Option<PickedImage>,
}
