// src/lib.rs

pub mod api_client;
pub mod errors;
pub mod htmx_handlers;
pub mod manager;
pub mod models;
pub mod router;
pub mod state;
pub mod views;
