pub mod app;
pub mod auth;
pub mod cache;
pub mod config;
pub mod errors;
pub mod pagination;
pub mod products;
pub mod state;
pub mod users;
