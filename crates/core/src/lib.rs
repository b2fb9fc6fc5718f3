//! Gaspass Core - Shared types library.
//!
//! This crate provides the types used across all Gaspass components:
//! - `storefront` - Catalog REST API server
//! - `client` - API client, checkout notifier and cart persistence
//! - `cli` - Command-line storefront
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure state - no network
//! I/O, no database access, no HTTP clients. Cart persistence goes through
//! the [`cart::CartStorage`] trait so the store itself stays testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices and emails
//! - [`catalog`] - Product, category, review and blog post models
//! - [`cart`] - The cart store and its persisted state
//! - [`checkout`] - Checkout requests, order summaries and delivery receipts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod types;

pub use types::*;
