pub mod api;
pub mod config;
pub mod http_client;
pub mod rame_client;
pub mod services;
