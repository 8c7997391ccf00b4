//! Account transaction synchronization engine.
//!
//! This crate pulls bank transactions for linked accounts from an upstream
//! open-banking provider through a paginated HTTP interface, reconciles them
//! into local stores with idempotent semantics, advances a durable
//! pagination cursor per account, and emits one change event per upsert for
//! downstream consumers.
//!
//! The crate is organized around trait seams so every collaborator is
//! swappable in tests and deployments:
//!
//! - [`provider`]: the gateway to the upstream provider
//! - [`store`]: account and transaction repositories
//! - [`sync`]: the orchestrator and its supporting services
//! - [`scheduler`]: the periodic sweep and the on-demand trigger
//! - [`config`]: service configuration
//! - [`domain`]: the core data model

pub mod config;
pub mod domain;
pub mod provider;
pub mod scheduler;
pub mod store;
pub mod sync;
