// SPDX-License-Identifier: Apache-2.0
//! Request-body parsing.
//!
//! Bodies are parsed from raw JSON values rather than derived, so the
//! PATCH contract stays expressible: an absent `ingredients` key means
//! "leave links untouched" while a present empty list means "replace
//! with nothing". Every failure is a field-level `ValidationError`
//! raised before any store call.

use serde_json::Value;

use crate::ApiError;
use tipple_model::{
    CocktailPatch, Email, IngredientName, IngredientSpec, NewCocktail, Rating, Username,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupParams {
    pub username: Username,
    pub email: Email,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReviewParams {
    pub content: String,
    pub rating: Rating,
}

fn body_object(body: &Value) -> Result<&serde_json::Map<String, Value>, ApiError> {
    body.as_object()
        .ok_or_else(|| ApiError::validation("body", "request body must be a JSON object"))
}

fn require_str<'a>(
    map: &'a serde_json::Map<String, Value>,
    field: &str,
) -> Result<&'a str, ApiError> {
    match map.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        Some(Value::String(_)) | None => {
            Err(ApiError::validation(field, format!("{field} is required")))
        }
        Some(_) => Err(ApiError::validation(field, format!("{field} must be a string"))),
    }
}

/// Nullable optional field: absent key and explicit `null` both map to
/// `None` here; patch parsing distinguishes them separately.
fn optional_str(
    map: &serde_json::Map<String, Value>,
    field: &str,
) -> Result<Option<String>, ApiError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ApiError::validation(field, format!("{field} must be a string"))),
    }
}

fn parse_ingredient_specs(value: &Value) -> Result<Vec<IngredientSpec>, ApiError> {
    let entries = value
        .as_array()
        .ok_or_else(|| ApiError::validation("ingredients", "ingredients must be a list"))?;
    let mut specs = Vec::with_capacity(entries.len());
    for entry in entries {
        let map = entry.as_object().ok_or_else(|| {
            ApiError::validation("ingredients", "each ingredient must be an object")
        })?;
        let name = IngredientName::parse(require_str(map, "name")?)?;
        let amount = optional_str(map, "amount")?.unwrap_or_default();
        specs.push(IngredientSpec { name, amount });
    }
    Ok(specs)
}

pub fn parse_signup(body: &Value) -> Result<SignupParams, ApiError> {
    let map = body_object(body)?;
    Ok(SignupParams {
        username: Username::parse(require_str(map, "username")?)?,
        email: Email::parse(require_str(map, "email")?)?,
        password: require_str(map, "password")?.to_string(),
    })
}

pub fn parse_login(body: &Value) -> Result<LoginParams, ApiError> {
    let map = body_object(body)?;
    Ok(LoginParams {
        username: require_str(map, "username")?.to_string(),
        password: require_str(map, "password")?.to_string(),
    })
}

pub fn parse_new_cocktail(body: &Value) -> Result<NewCocktail, ApiError> {
    let map = body_object(body)?;
    let ingredients = match map.get("ingredients") {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => parse_ingredient_specs(value)?,
    };
    Ok(NewCocktail {
        name: require_str(map, "name")?.to_string(),
        instructions: require_str(map, "instructions")?.to_string(),
        image_url: optional_str(map, "image_url")?,
        glass_type: optional_str(map, "glass_type")?,
        ingredients,
    })
}

pub fn parse_cocktail_patch(body: &Value) -> Result<CocktailPatch, ApiError> {
    let map = body_object(body)?;
    let mut patch = CocktailPatch::default();
    if map.contains_key("name") {
        patch.name = Some(require_str(map, "name")?.to_string());
    }
    if map.contains_key("instructions") {
        patch.instructions = Some(require_str(map, "instructions")?.to_string());
    }
    if map.contains_key("image_url") {
        patch.image_url = Some(optional_str(map, "image_url")?);
    }
    if map.contains_key("glass_type") {
        patch.glass_type = Some(optional_str(map, "glass_type")?);
    }
    if let Some(value) = map.get("ingredients") {
        patch.ingredients = Some(parse_ingredient_specs(value)?);
    }
    Ok(patch)
}

pub fn parse_new_review(body: &Value) -> Result<NewReviewParams, ApiError> {
    let map = body_object(body)?;
    let content = require_str(map, "content")?.to_string();
    let raw_rating = map
        .get("rating")
        .and_then(Value::as_i64)
        .ok_or_else(|| ApiError::validation("rating", "rating must be an integer"))?;
    Ok(NewReviewParams {
        content,
        rating: Rating::parse(raw_rating)?,
    })
}
