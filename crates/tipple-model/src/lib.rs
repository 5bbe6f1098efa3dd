#![forbid(unsafe_code)]
//! Catalog model SSOT: entities, validated newtypes, and the joined
//! entity graphs the serialization layer projects from.

mod cocktail;
mod review;
mod user;

pub use cocktail::{
    Cocktail, CocktailGraph, CocktailIngredient, CocktailPatch, Ingredient, IngredientLink,
    IngredientName, IngredientSpec, NewCocktail, INGREDIENT_NAME_MAX_LEN,
};
pub use review::{Rating, Review, RATING_MAX, RATING_MIN};
pub use user::{Email, User, Username, EMAIL_MAX_LEN, USERNAME_MAX_LEN};

pub const CRATE_NAME: &str = "tipple-model";

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    Trimmed(&'static str),
    TooLong(&'static str, usize),
    OutOfRange(&'static str, i64, i64),
    InvalidFormat(&'static str, &'static str),
}

impl ParseError {
    /// Name of the offending field, for field-level error bodies.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Empty(name)
            | Self::Trimmed(name)
            | Self::TooLong(name, _)
            | Self::OutOfRange(name, _, _)
            | Self::InvalidFormat(name, _) => name,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::Trimmed(name) => {
                write!(f, "{name} must not contain leading/trailing whitespace")
            }
            Self::TooLong(name, max) => write!(f, "{name} exceeds max length {max}"),
            Self::OutOfRange(name, min, max) => {
                write!(f, "{name} must be between {min} and {max}")
            }
            Self::InvalidFormat(_, msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ParseError {}
