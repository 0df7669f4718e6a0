// src/manager.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use strum_macros::Display;
use tokio::sync::Mutex;

use crate::{
    api_client::ProductApi,
    errors::AppError,
    models::{FormInput, PickedImage, Product, ProductDraft, ScreenMode},
};

/// Wynik wysłania formularza.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SubmitOutcome {
    Created,
    Updated,
    /// Brak nazwy, opisu lub ceny; nic nie zostało wysłane.
    Incomplete,
    /// Poprzednie wysłanie jeszcze trwa.
    AlreadyInFlight,
    /// Formularz nie jest otwarty; nic nie zostało wysłane.
    FormClosed,
}

#[derive(Debug, Default)]
struct Screen {
    mode: ScreenMode,
    draft: ProductDraft,
    products: Vec<Product>,
    notice: Option<String>,
    /// Zmienia się przy każdym otwarciu i zamknięciu formularza.
    form_generation: u64,
}

impl Screen {
    fn reset_form(&mut self) {
        self.open_form(ScreenMode::Browsing, ProductDraft::default());
    }

    fn open_form(&mut self, mode: ScreenMode, draft: ProductDraft) {
        self.mode = mode;
        self.draft = draft;
        self.notice = None;
        self.form_generation = self.form_generation.wrapping_add(1);
    }
}

/// Wiersz listy gotowy do wyrenderowania.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub product: Product,
    pub image_url: Option<String>,
}

/// Migawka stanu ekranu do renderowania.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenView {
    pub mode: ScreenMode,
    pub draft: ProductDraft,
    pub rows: Vec<ProductRow>,
    pub notice: Option<String>,
    pub submitting: bool,
}

/// Flaga "żądanie w toku", zwalniana przy drop.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Stan ekranu zarządzania produktami.
///
/// Blokada na stanie nigdy nie jest trzymana podczas żądania sieciowego.
pub struct ProductManager {
    api: Arc<dyn ProductApi>,
    screen: Mutex<Screen>,
    submitting: AtomicBool,
}

impl ProductManager {
    pub fn new(api: Arc<dyn ProductApi>) -> Self {
        ProductManager {
            api,
            screen: Mutex::new(Screen::default()),
            submitting: AtomicBool::new(false),
        }
    }

    /// Pobiera całą listę i zastępuje nią lokalną kopię.
    /// Przy błędzie poprzednia lista zostaje bez zmian.
    pub async fn load(&self) -> Result<usize, AppError> {
        match self.api.list_products().await {
            Ok(products) => {
                let count = products.len();
                self.screen.lock().await.products = products;
                tracing::info!("Pobrano listę produktów: {} pozycji", count);
                Ok(count)
            }
            Err(e) => {
                tracing::error!("Błąd pobierania produktów: {}", e);
                Err(e)
            }
        }
    }

    pub async fn start_create(&self) {
        self.screen
            .lock()
            .await
            .open_form(ScreenMode::Creating, ProductDraft::default());
    }

    pub async fn start_edit(&self, id: &str) -> Result<(), AppError> {
        let mut screen = self.screen.lock().await;
        let product = match screen.products.iter().find(|p| p.id == id) {
            Some(product) => product.clone(),
            None => {
                tracing::warn!("Nie znaleziono produktu do edycji o ID: {}", id);
                return Err(AppError::NotFound);
            }
        };

        let draft = ProductDraft::from_product(&product);
        screen.open_form(ScreenMode::Editing(product.id), draft);
        Ok(())
    }

    /// Nadpisuje pola tekstowe szkicu; wybrany obraz zostaje.
    /// Bez otwartego formularza nic nie robi.
    pub async fn update_draft(&self, name: &str, description: &str, price: &str) {
        let mut screen = self.screen.lock().await;
        if !screen.mode.form_visible() {
            tracing::debug!("Pominięto zmianę szkicu: formularz zamknięty");
            return;
        }
        screen.draft.name = name.to_string();
        screen.draft.description = description.to_string();
        screen.draft.price = price.to_string();
    }

    pub async fn pick_image(&self, image: PickedImage) {
        let mut screen = self.screen.lock().await;
        if !screen.mode.form_visible() {
            tracing::debug!("Pominięto wybór obrazu: formularz zamknięty");
            return;
        }
        tracing::debug!("Wybrano obraz: {:?}", image);
        screen.draft.image = Some(image);
    }

    pub async fn cancel(&self) {
        self.screen.lock().await.reset_form();
    }

    /// Wysyła bieżący szkic: POST dla nowego produktu, PUT dla edytowanego.
    pub async fn submit(&self) -> Result<SubmitOutcome, AppError> {
        self.submit_with(None).await
    }

    /// Zapisuje pola formularza w szkicu i wysyła go.
    /// Pola trafiają do szkicu dopiero po zajęciu flagi "w toku".
    pub async fn submit_form(&self, input: FormInput) -> Result<SubmitOutcome, AppError> {
        self.submit_with(Some(input)).await
    }

    async fn submit_with(&self, input: Option<FormInput>) -> Result<SubmitOutcome, AppError> {
        let Some(_in_flight) = InFlightGuard::acquire(&self.submitting) else {
            tracing::warn!("Pominięto wysłanie formularza: poprzednie żądanie w toku");
            return Ok(SubmitOutcome::AlreadyInFlight);
        };

        let (target, submission, generation) = {
            let mut screen = self.screen.lock().await;
            if !screen.mode.form_visible() {
                tracing::warn!("Pominięto wysłanie formularza: formularz zamknięty");
                return Ok(SubmitOutcome::FormClosed);
            }
            if let Some(input) = input {
                screen.draft.name = input.name;
                screen.draft.description = input.description;
                screen.draft.price = input.price;
                if input.image.is_some() {
                    screen.draft.image = input.image;
                }
            }
            if !screen.draft.is_complete() {
                tracing::debug!("Pominięto wysłanie niekompletnego formularza");
                return Ok(SubmitOutcome::Incomplete);
            }
            match screen.draft.to_submission() {
                Ok(submission) => {
                    screen.notice = None;
                    (
                        screen.mode.edit_target().map(str::to_owned),
                        submission,
                        screen.form_generation,
                    )
                }
                Err(e) => {
                    tracing::warn!("Formularz odrzucony: {}", e);
                    screen.notice = Some(e.user_message());
                    return Err(e);
                }
            }
        };

        let result = match &target {
            Some(id) => self.api.update_product(id, submission).await,
            None => self.api.create_product(submission).await,
        };
        if let Err(e) = result {
            tracing::error!("Błąd zapisu produktu (ID: {:?}): {}", target, e);
            return Err(e);
        }

        {
            let mut screen = self.screen.lock().await;
            if screen.form_generation == generation {
                screen.reset_form();
            } else {
                tracing::info!("Formularz zmieniony w trakcie zapisu, pozostawiam go otwartym");
            }
        }

        let outcome = match target {
            Some(id) => {
                tracing::info!("Zaktualizowano produkt o ID: {}", id);
                SubmitOutcome::Updated
            }
            None => {
                tracing::info!("Utworzono nowy produkt");
                SubmitOutcome::Created
            }
        };

        if self.load().await.is_err() {
            tracing::warn!("Produkt zapisany, ale odświeżenie listy nie powiodło się");
        }
        Ok(outcome)
    }

    /// Usuwa produkt i zawsze odświeża listę, także po błędzie.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = self.api.delete_product(id).await;
        match &result {
            Ok(()) => {
                tracing::info!("Usunięto produkt o ID: {}", id);
                let mut screen = self.screen.lock().await;
                if screen.mode.edit_target() == Some(id) {
                    screen.reset_form();
                }
            }
            Err(e) => tracing::error!("Błąd usuwania produktu {}: {}", id, e),
        }

        if self.load().await.is_err() {
            tracing::warn!("Nie udało się odświeżyć listy po usunięciu produktu {}", id);
        }
        result
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    pub async fn snapshot(&self) -> ScreenView {
        let screen = self.screen.lock().await;
        let rows = screen
            .products
            .iter()
            .map(|product| ProductRow {
                image_url: product
                    .image
                    .as_deref()
                    .filter(|f| !f.is_empty())
                    .map(|f| self.api.image_url(f)),
                product: product.clone(),
            })
            .collect();

        ScreenView {
            mode: screen.mode.clone(),
            draft: screen.draft.clone(),
            rows,
            notice: screen.notice.clone(),
            submitting: self.is_submitting(),
        }
    }
}
