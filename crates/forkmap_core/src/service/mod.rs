//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and resolver calls into use-case level APIs.
//! - Keep front ends decoupled from storage and HTTP details.

pub mod import_service;
