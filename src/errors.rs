// ABOUTME: Re-exports the unified error types from recipe-core
// ABOUTME: Lets the rest of the crate import errors from crate::errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

//! Unified error handling, defined in `recipe-core`

pub use recipe_core::errors::{
    AppError, AppResult, DatabaseError, ErrorCode, ErrorResponse, ErrorResponseDetails,
};
