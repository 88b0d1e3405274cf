//! The resume document: editing model, validation, preview and persistence.

pub mod editor;
pub mod handlers;
pub mod mapping;
pub mod models;
pub mod persistence;
pub mod preview;
pub mod reorder;
pub mod repository;
pub mod validation;
