//! Web API Backend Library
//!
//! Credential authentication and token issuance for the web API, with the
//! user store, password hashing and JWT plumbing it depends on.

pub mod app_state;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod users;
