//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Link`] - A shortened URL mapping with its click counter
//!
//! # Design Pattern
//!
//! Entities follow the "New Type" pattern with a separate struct for creation:
//! [`NewLink`] carries only the fields the caller chooses, while the store assigns
//! `id`, `created_at` and the initial `click_count`.

pub mod link;

pub use link::{Link, NewLink};
