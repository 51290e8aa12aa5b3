pub mod db;
pub mod deck;
pub mod server;
pub mod services;
pub mod web;
