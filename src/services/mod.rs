pub mod auth_service;
pub mod image_storage;
