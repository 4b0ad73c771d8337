// ABOUTME: Core types and constants for the recipe API
// ABOUTME: Foundation crate with error handling, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

#![deny(unsafe_code)]

//! # Recipe Core
//!
//! Foundation crate providing shared types for the recipe API. It changes
//! infrequently, so the service crate gets incremental compilation benefits.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and database error classification
//! - **models**: Recipe, ingredient, unit and instruction models plus the request payloads
//! - **constants**: Defaults, environment keys and table names

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Domain models and wire payloads
pub mod models;

/// Application constants organized by domain
pub mod constants;
