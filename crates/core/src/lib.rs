#![warn(clippy::all, missing_docs)]

//! Core domain logic for the veteran support hub.
//!
//! This crate hosts the resource and veteran models, their JSON
//! persistence, the catalog and registry operations, and configuration
//! handling used by the console frontend.

pub mod catalog;
pub mod config;
pub mod models;
pub mod registry;
pub mod store;

pub use catalog::{Catalog, CatalogError, CatalogStore, Category};
pub use config::AppConfig;
pub use models::{DecodeError, Resource, ResourceKind, Veteran};
pub use registry::{InputError, NewVeteran, Registry, RegistryError, VeteranEdit};
