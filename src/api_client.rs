// src/api_client.rs

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, Response, multipart};

use crate::{
    errors::AppError,
    models::{Product, ProductSubmission},
    state::ApiConfig,
};

/// Operacje zewnętrznego serwisu produktów.
#[automock]
#[async_trait]
pub trait ProductApi: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, AppError>;

    async fn create_product(&self, submission: ProductSubmission) -> Result<(), AppError>;

    async fn update_product(&self, id: &str, submission: ProductSubmission)
    -> Result<(), AppError>;

    async fn delete_product(&self, id: &str) -> Result<(), AppError>;

    /// Adres miniatury dla nazwy pliku zapisanej w produkcie.
    fn image_url(&self, filename: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct HttpProductApi {
    client: Client,
    config: ApiConfig,
}

impl HttpProductApi {
    pub fn new(config: ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(HttpProductApi { client, config })
    }

    async fn send_submission(
        &self,
        method: reqwest::Method,
        url: &str,
        submission: ProductSubmission,
    ) -> Result<(), AppError> {
        let request_builder = self.client.request(method.clone(), url);

        let request_builder = match submission.image {
            Some(image) => {
                tracing::debug!(
                    "{} {} jako multipart, plik: {}, rozmiar: {} bajtów",
                    method,
                    url,
                    image.file_name,
                    image.bytes.len()
                );
                let part = multipart::Part::bytes(image.bytes)
                    .file_name(image.file_name)
                    .mime_str(&image.content_type)
                    .map_err(|e| {
                        tracing::error!("Błąd ustawiania typu MIME: {}", e);
                        AppError::UnprocessableEntity(format!(
                            "Nieprawidłowy typ pliku: {}",
                            image.content_type
                        ))
                    })?;

                let form = multipart::Form::new()
                    .text("name", submission.payload.name)
                    .text("description", submission.payload.description)
                    .text("price", submission.payload.price.to_string())
                    .part("image", part);

                request_builder.multipart(form)
            }
            None => {
                tracing::debug!("{} {} jako JSON: {:?}", method, url, submission.payload);
                request_builder.json(&submission.payload)
            }
        };

        let resp = request_builder.send().await.map_err(|e| {
            tracing::error!("Błąd sieci podczas {} {}: {}", method, url, e);
            AppError::NetworkFailure(e)
        })?;

        ensure_success(resp).await?;
        Ok(())
    }
}

/// Zamienia odpowiedź spoza zakresu 2xx na `ServerFailure`.
async fn ensure_success(resp: Response) -> Result<Response, AppError> {
    if resp.status().is_success() {
        return Ok(resp);
    }

    let status = resp.status();
    let body = resp
        .text()
        .await
        .unwrap_or_else(|_| "Brak treści błędu".to_string());
    tracing::error!(
        "Błąd serwisu produktów: Status={}, Treść={}",
        status,
        body
    );
    Err(AppError::ServerFailure { status, body })
}

#[async_trait]
impl ProductApi for HttpProductApi {
    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let url = self.config.collection_url();
        tracing::debug!("GET {}", url);

        let resp = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!("Błąd sieci podczas pobierania produktów: {}", e);
            AppError::NetworkFailure(e)
        })?;
        let resp = ensure_success(resp).await?;

        resp.json::<Vec<Product>>().await.map_err(|e| {
            tracing::error!("Błąd deserializacji listy produktów: {}", e);
            AppError::InvalidResponse(format!("Nieprawidłowa lista produktów: {}", e))
        })
    }

    async fn create_product(&self, submission: ProductSubmission) -> Result<(), AppError> {
        let url = self.config.collection_url();
        self.send_submission(reqwest::Method::POST, &url, submission)
            .await
    }

    async fn update_product(
        &self,
        id: &str,
        submission: ProductSubmission,
    ) -> Result<(), AppError> {
        let url = self.config.item_url(id);
        self.send_submission(reqwest::Method::PUT, &url, submission)
            .await
    }

    async fn delete_product(&self, id: &str) -> Result<(), AppError> {
        let url = self.config.item_url(id);
        tracing::debug!("DELETE {}", url);

        let resp = self.client.delete(&url).send().await.map_err(|e| {
            tracing::error!("Błąd sieci podczas usuwania produktu {}: {}", id, e);
            AppError::NetworkFailure(e)
        })?;

        ensure_success(resp).await?;
        Ok(())
    }

    fn image_url(&self, filename: &str) -> String {
        self.config.image_url(filename)
    }
}
