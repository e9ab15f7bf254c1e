//! Persistence layer for the wedding site backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations, scoped per event
//! - The PostgreSQL-backed [`gateway::PostgresGateway`]
//! - The object store client used for photo uploads

pub mod db;
pub mod entities;
pub mod gateway;
pub mod media;
pub mod metrics;
pub mod repositories;
