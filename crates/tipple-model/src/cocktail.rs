// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::{ParseError, Review, User};

pub const INGREDIENT_NAME_MAX_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct IngredientName(String);

impl IngredientName {
    /// Exact-match resolution key: no trimming, no case folding.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("ingredient name"));
        }
        if input.len() > INGREDIENT_NAME_MAX_LEN {
            return Err(ParseError::TooLong(
                "ingredient name",
                INGREDIENT_NAME_MAX_LEN,
            ));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Cocktail {
    pub id: i64,
    pub name: String,
    pub instructions: String,
    pub image_url: Option<String>,
    pub glass_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ingredient {
    pub id: i64,
    pub name: IngredientName,
}

/// Association entity, not a bare join row: each usage of an
/// ingredient in a cocktail carries its own `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CocktailIngredient {
    pub id: i64,
    pub cocktail_id: i64,
    pub ingredient_id: i64,
    pub amount: String,
}

/// One requested ingredient line in a create/update payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSpec {
    pub name: IngredientName,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCocktail {
    pub name: String,
    pub instructions: String,
    pub image_url: Option<String>,
    pub glass_type: Option<String>,
    pub ingredients: Vec<IngredientSpec>,
}

/// Partial update. Outer `None` means "key absent, leave unchanged";
/// for nullable columns the inner `Option` carries the new value.
/// `ingredients: Some(_)` triggers a full replace of the link set,
/// even when the list is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CocktailPatch {
    pub name: Option<String>,
    pub instructions: Option<String>,
    pub image_url: Option<Option<String>>,
    pub glass_type: Option<Option<String>>,
    pub ingredients: Option<Vec<IngredientSpec>>,
}

impl CocktailPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.instructions.is_none()
            && self.image_url.is_none()
            && self.glass_type.is_none()
            && self.ingredients.is_none()
    }
}

/// An ingredient link joined with its ingredient row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientLink {
    pub link: CocktailIngredient,
    pub ingredient: Ingredient,
}

/// Fully-joined read result for a single cocktail. Back-edges are
/// pruned when this graph is projected to a response view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CocktailGraph {
    pub cocktail: Cocktail,
    pub reviews: Vec<(Review, User)>,
    pub ingredients: Vec<IngredientLink>,
    pub liked_by: Vec<User>,
}
