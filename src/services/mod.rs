// ABOUTME: Domain service layer for recipe business logic, independent of HTTP
// ABOUTME: Owns transaction boundaries for creates, reads, updates and deletes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

//! Domain service layer
//!
//! Route handlers stay thin and call into these services, which decide the
//! transaction boundaries and the error taxonomy.

/// Atomic creation of a recipe with its instructions and ingredient lines
pub mod composer;

/// Recipe reads, scalar updates and cascading deletes
pub mod queries;

pub use composer::RecipeComposer;
pub use queries::RecipeQueryService;
