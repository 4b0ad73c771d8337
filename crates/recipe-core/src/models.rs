// ABOUTME: Domain models for recipes, shared ingredient/unit lookups, and instructions
// ABOUTME: Also holds the create/update payloads accepted by the HTTP layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe API Contributors

//! Recipe domain models
//!
//! A [`Recipe`] exclusively owns its [`Instruction`]s and [`RecipeIngredient`]
//! lines. [`Ingredient`] and [`Unit`] rows are shared lookup entities keyed by a
//! unique label and outlive any single recipe.
//!
//! JSON field names follow the public API (`stepNumber`, `stepText`,
//! `stepTime`), so the Rust names and the wire names differ in a few places.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// Fixed-precision quantity with two decimal places
///
/// Stored as integer hundredths so that `1.10` survives a round trip through
/// the store unchanged. On the wire it is a plain JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(i64);

impl Amount {
    /// Build from integer hundredths (`150` is `1.50`)
    #[must_use]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    /// Integer hundredths, the stored representation
    #[must_use]
    pub const fn hundredths(self) -> i64 {
        self.0
    }

    /// Decimal value
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl TryFrom<f64> for Amount {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(format!("amount must be a finite number, got {value}"));
        }
        let scaled = (value * 100.0).round();
        if scaled.abs() > i64::MAX as f64 {
            return Err(format!("amount {value} is out of range"));
        }
        Ok(Self(scaled as i64))
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> Self {
        amount.as_f64()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.as_f64())
    }
}

/// Shared ingredient lookup row, unique by label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Row identity
    pub id: i64,
    /// Unique label, e.g. "Salt"
    pub label: String,
}

/// Shared unit lookup row, unique by label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Row identity
    pub id: i64,
    /// Unique label, e.g. "Cup"
    pub label: String,
}

/// One step of a recipe's method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Row identity
    pub id: i64,
    /// Owning recipe
    pub recipe_id: i64,
    /// Ordering key, always greater than zero
    #[serde(rename = "stepNumber")]
    pub step_number: u32,
    /// Step text
    #[serde(rename = "stepText")]
    pub step_text: String,
    /// Optional duration of the step
    #[serde(rename = "stepTime", default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// Optional free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One line of a recipe's ingredient list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Row identity
    pub id: i64,
    /// Owning recipe
    pub recipe_id: i64,
    /// Linked ingredient
    pub ingredient_id: i64,
    /// Linked unit; absent for unitless lines ("to taste")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<i64>,
    /// Quantity with two decimal places
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    /// Resolved ingredient
    pub ingredient: Ingredient,
    /// Resolved unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

/// A recipe with its instructions and ingredient lines populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Row identity
    pub id: i64,
    /// Globally unique name
    pub name: String,
    /// Difficulty rating
    pub difficulty: i32,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional owning user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Ingredient lines, in insertion order
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    /// Instructions, by step number
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

/// Reference to a shared lookup row by its natural key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRef {
    /// Natural key
    pub label: String,
}

impl LabelRef {
    /// Convenience constructor
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// How an ingredient line names its ingredient or unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupRef<'a> {
    /// Find-or-create by label
    Label(&'a str),
    /// Existing row by id
    Id(i64),
}

/// Instruction entry of a create payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInstruction {
    /// Positive ordering key; zero is rejected while parsing
    #[serde(rename = "stepNumber")]
    pub step_number: NonZeroU32,
    /// Step text
    #[serde(rename = "stepText", default)]
    pub step_text: String,
    /// Optional duration
    #[serde(rename = "stepTime", default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// Optional notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Ingredient line of a create payload
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewIngredientLine {
    /// Optional quantity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    /// Ingredient by label, created on first use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient: Option<LabelRef>,
    /// Ingredient by id, must already exist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_id: Option<i64>,
    /// Unit by label, created on first use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<LabelRef>,
    /// Unit by id, must already exist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<i64>,
}

fn lookup_ref<'a>(
    field: &str,
    by_label: Option<&'a LabelRef>,
    by_id: Option<i64>,
) -> AppResult<Option<LookupRef<'a>>> {
    match (by_label, by_id) {
        (Some(label_ref), _) => {
            let label = label_ref.label.trim();
            if label.is_empty() {
                return Err(AppError::invalid_input(format!(
                    "{field} label must not be empty"
                )));
            }
            Ok(Some(LookupRef::Label(label)))
        }
        (None, Some(id)) => Ok(Some(LookupRef::Id(id))),
        (None, None) => Ok(None),
    }
}

impl NewIngredientLine {
    /// Line with an ingredient label, a unit label and an amount
    pub fn labelled(ingredient: &str, unit: Option<&str>, amount: Option<Amount>) -> Self {
        Self {
            amount,
            ingredient: Some(LabelRef::new(ingredient)),
            unit: unit.map(LabelRef::new),
            ..Self::default()
        }
    }

    /// The ingredient this line points at; a line without one is rejected
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when neither a label nor an id is given, or the label is blank
    pub fn ingredient_ref(&self) -> AppResult<LookupRef<'_>> {
        lookup_ref("ingredient", self.ingredient.as_ref(), self.ingredient_id)?
            .ok_or_else(|| AppError::missing_field("ingredient"))
    }

    /// The unit this line points at, if any
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the unit label is blank
    pub fn unit_ref(&self) -> AppResult<Option<LookupRef<'_>>> {
        lookup_ref("unit", self.unit.as_ref(), self.unit_id)
    }
}

/// Denormalized recipe accepted by `POST /recipe/add`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    /// Unique name
    pub name: String,
    /// Difficulty rating
    pub difficulty: i32,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional owning user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Steps, stored in the given order
    #[serde(default)]
    pub instructions: Vec<NewInstruction>,
    /// Ingredient lines, stored in the given order
    #[serde(default)]
    pub ingredients: Vec<NewIngredientLine>,
}

impl CreateRecipeRequest {
    /// Check everything that can be rejected before a transaction starts
    ///
    /// # Errors
    ///
    /// Returns a client error for a blank name or an unresolvable ingredient line
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::missing_field("name"));
        }
        for (index, line) in self.ingredients.iter().enumerate() {
            line.ingredient_ref()
                .and_then(|_| line.unit_ref())
                .map_err(|e| {
                    AppError::new(e.code, format!("ingredients[{index}]: {}", e.message))
                })?;
        }
        Ok(())
    }

    /// Step numbers that appear more than once, in ascending order
    #[must_use]
    pub fn duplicate_step_numbers(&self) -> Vec<u32> {
        let mut steps: Vec<u32> = self.instructions.iter().map(|i| i.step_number.get()).collect();
        steps.sort_unstable();
        let mut duplicates: Vec<u32> = steps
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .map(|pair| pair[0])
            .collect();
        duplicates.dedup();
        duplicates
    }
}

/// Scalar fields replaced by `PUT /recipe/...`; absent fields are left alone
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateRecipeRequest {
    /// New name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New difficulty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<i32>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New owning user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl UpdateRecipeRequest {
    /// True when the payload would not change anything
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.difficulty.is_none()
            && self.description.is_none()
            && self.user_id.is_none()
    }
}
