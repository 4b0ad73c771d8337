// ABOUTME: Re-exports recipe domain models and payloads from recipe-core
// ABOUTME: Lets the rest of the crate import models from crate::models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

//! Domain models, defined in `recipe-core`

pub use recipe_core::models::{
    Amount, CreateRecipeRequest, Ingredient, Instruction, LabelRef, LookupRef, NewIngredientLine,
    NewInstruction, Recipe, RecipeIngredient, Unit, UpdateRecipeRequest,
};
