#![forbid(unsafe_code)]
//! API surface single source of truth: error envelope, projection
//! views, and request-body parsing.
//!
//! Projections are explicit tree-shaped structs, one per endpoint
//! shape. A view type never carries a field for the inverse edge of
//! the relationship it was reached through, so serialized output is
//! acyclic by construction.

mod errors;
pub mod params;
pub mod views;

pub use errors::{ApiError, ApiErrorCode};
pub use views::{
    AuthStatusView, CocktailDetailView, CocktailSummaryView, IngredientLinkView, IngredientView,
    LikeCountView, ReviewView, UserProfileView, UserView,
};

pub const CRATE_NAME: &str = "tipple-api";
