#![doc = "The `tasknest` library crate."]
#![doc = ""]
#![doc = "This crate contains the authentication core of the TaskNest todo backend:"]
#![doc = "password hashing, token issuance and verification, per-request identity"]
#![doc = "resolution, and the registration/login service, together with the storage"]
#![doc = "collaborator, configuration, error mapping and HTTP routes around it."]
#![doc = "It is used by the main binary (`main.rs`) to construct and run the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod storage;

pub use crate::error::AppError;
