pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod items;
pub mod nullable;
pub mod pagination;
pub mod state;
pub mod users;
