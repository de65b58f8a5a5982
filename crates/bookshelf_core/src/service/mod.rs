//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store mutations and repository saves into use-case APIs.
//! - Keep front ends decoupled from persistence details.

pub mod library_service;
