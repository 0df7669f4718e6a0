// src/views.rs

use maud::{DOCTYPE, Markup, html};

use crate::manager::{ProductRow, ScreenView};

pub const EMPTY_STATE_TEXT: &str = "No products available";

pub fn format_price(price: f64) -> String {
    format!("Rs {}", price)
}

/// Pełna strona z ekranem zarządzania produktami.
pub fn render_page(view: &ScreenView) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Product Management" }
                script src="https://unpkg.com/htmx.org@2.0.4" {}
            }
            body ."bg-gray-50" {
                (render_screen(view))
            }
        }
    }
}

/// Fragment `#product-manager` podmieniany po każdej akcji.
pub fn render_screen(view: &ScreenView) -> Markup {
    html! {
        div #product-manager ."max-w-xl mx-auto p-6" {
            h1 ."text-3xl font-bold text-center text-sky-600 mb-2" { "E-commerce" }
            h2 ."text-2xl font-bold text-center mb-5" { "Product Management" }

            @if view.mode.form_visible() {
                (render_form(view))
            } @else {
                button type="button"
                    class="w-full bg-sky-600 text-white font-bold rounded p-2 mb-3"
                    "hx-post"="/htmx/form/new"
                    "hx-target"="#product-manager"
                    "hx-swap"="outerHTML" {
                    "Add Product"
                }
            }

            (render_product_list(&view.rows))
        }
    }
}

fn render_form(view: &ScreenView) -> Markup {
    let editing = view.mode.edit_target().is_some();
    let submit_label = if editing { "Update Product" } else { "Add Product" };

    html! {
        form #product-form
            "hx-post"="/htmx/form/submit"
            "hx-encoding"="multipart/form-data"
            "hx-target"="#product-manager"
            "hx-swap"="outerHTML"
            "hx-disabled-elt"="find button[type='submit']"
            class="space-y-2 mb-4" {
            @if let Some(notice) = &view.notice {
                p #form-notice ."text-red-600 text-sm" { (notice) }
            }
            input type="text" name="name" placeholder="Product Name"
                value=(view.draft.name) class="w-full border-2 rounded-lg p-2";
            input type="text" name="description" placeholder="Description"
                value=(view.draft.description) class="w-full border-2 rounded-lg p-2";
            input type="text" name="price" placeholder="Price" inputmode="decimal"
                value=(view.draft.price) class="w-full border-2 rounded-lg p-2";
            input type="file" name="image" accept="image/*" class="w-full";
            @if let Some(image) = &view.draft.image {
                p ."text-sm text-gray-500" { "Selected image: " (image.file_name) }
            }
            div ."flex gap-2" {
                button type="submit" disabled[view.submitting]
                    class="flex-1 bg-sky-600 text-white font-bold rounded p-2" {
                    (submit_label)
                }
                button type="button"
                    class="flex-1 border rounded p-2"
                    "hx-post"="/htmx/form/cancel"
                    "hx-target"="#product-manager"
                    "hx-swap"="outerHTML" {
                    "Cancel"
                }
            }
        }
    }
}

pub fn render_product_list(rows: &[ProductRow]) -> Markup {
    html! {
        div #product-list {
            @if rows.is_empty() {
                p ."text-center text-lg text-gray-500 mt-5" { (EMPTY_STATE_TEXT) }
            } @else {
                ul role="list" ."space-y-2" {
                    @for row in rows {
                        (render_product_row(row))
                    }
                }
            }
        }
    }
}

fn render_product_row(row: &ProductRow) -> Markup {
    let product = &row.product;
    let edit_url = format!("/htmx/products/{}/edit", urlencoding::encode(&product.id));
    let delete_url = format!("/htmx/products/{}/delete", urlencoding::encode(&product.id));

    html! {
        li ."product-row flex items-center justify-between bg-gray-100 rounded p-3"
            data-product-id=(product.id) {
            div ."flex-1" {
                @if let Some(src) = &row.image_url {
                    img src=(src) alt=(product.name) width="100" height="100" loading="lazy";
                } @else {
                    div ."w-24 h-24 bg-gray-200 flex items-center justify-center text-xs text-gray-400" {
                        "No image"
                    }
                }
                p ."text-lg font-bold" { (product.name) }
                p ."text-gray-600" { (product.description) }
                p ."text-green-700" { (format_price(product.price)) }
            }
            div ."flex gap-3" {
                button type="button" title="Edit"
                    class="text-sky-600 font-bold"
                    "hx-post"=(edit_url)
                    "hx-target"="#product-manager"
                    "hx-swap"="outerHTML" {
                    "Edit"
                }
                button type="button" title="Delete"
                    class="text-red-600 font-bold"
                    "hx-post"=(delete_url)
                    "hx-confirm"={"Delete " (product.name) "?"}
                    "hx-target"="#product-manager"
                    "hx-swap"="outerHTML" {
                    "Delete"
                }
            }
        }
    }
}
