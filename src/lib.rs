pub mod auth;
pub mod configuration;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod startup;
pub mod telemetry;
