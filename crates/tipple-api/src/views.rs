// SPDX-License-Identifier: Apache-2.0
//! Response projections.
//!
//! Each view is the tree the endpoint returns, nothing more: a
//! `ReviewView` has an author but the author has no review collection,
//! a `CocktailDetailView` lists liking users but those users carry no
//! liked-cocktails edge. Credential material has no field anywhere.

use serde::{Deserialize, Serialize};

use tipple_model::{Cocktail, CocktailGraph, Review, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl UserView {
    #[must_use]
    pub fn project(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngredientView {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngredientLinkView {
    pub id: i64,
    pub ingredient: IngredientView,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewView {
    pub id: i64,
    pub content: String,
    pub rating: i64,
    pub user: UserView,
}

impl ReviewView {
    #[must_use]
    pub fn project(review: &Review, author: &User) -> Self {
        Self {
            id: review.id,
            content: review.content.clone(),
            rating: review.rating.value(),
            user: UserView::project(author),
        }
    }
}

/// Scalar-only cocktail shape for cheap list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CocktailSummaryView {
    pub id: i64,
    pub name: String,
    pub instructions: String,
    pub image_url: Option<String>,
    pub glass_type: Option<String>,
}

impl CocktailSummaryView {
    #[must_use]
    pub fn project(cocktail: &Cocktail) -> Self {
        Self {
            id: cocktail.id,
            name: cocktail.name.clone(),
            instructions: cocktail.instructions.clone(),
            image_url: cocktail.image_url.clone(),
            glass_type: cocktail.glass_type.clone(),
        }
    }
}

/// Single-item cocktail shape: one level of reviews, ingredient links,
/// and liking users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CocktailDetailView {
    pub id: i64,
    pub name: String,
    pub instructions: String,
    pub image_url: Option<String>,
    pub glass_type: Option<String>,
    pub reviews: Vec<ReviewView>,
    pub ingredients: Vec<IngredientLinkView>,
    pub likes: Vec<UserView>,
}

impl CocktailDetailView {
    #[must_use]
    pub fn project(graph: &CocktailGraph) -> Self {
        Self {
            id: graph.cocktail.id,
            name: graph.cocktail.name.clone(),
            instructions: graph.cocktail.instructions.clone(),
            image_url: graph.cocktail.image_url.clone(),
            glass_type: graph.cocktail.glass_type.clone(),
            reviews: graph
                .reviews
                .iter()
                .map(|(review, author)| ReviewView::project(review, author))
                .collect(),
            ingredients: graph
                .ingredients
                .iter()
                .map(|entry| IngredientLinkView {
                    id: entry.link.id,
                    ingredient: IngredientView {
                        id: entry.ingredient.id,
                        name: entry.ingredient.name.as_str().to_string(),
                    },
                    amount: entry.link.amount.clone(),
                })
                .collect(),
            likes: graph.liked_by.iter().map(UserView::project).collect(),
        }
    }
}

/// User with liked cocktails on explicit request; the liked cocktails
/// are summaries, so their own likes edge is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserProfileView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub liked_cocktails: Vec<CocktailSummaryView>,
}

impl UserProfileView {
    #[must_use]
    pub fn project(user: &User, liked: &[Cocktail]) -> Self {
        Self {
            id: user.id,
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            liked_cocktails: liked.iter().map(CocktailSummaryView::project).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStatusView {
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
    pub user: Option<UserView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LikeCountView {
    pub likes: u64,
}
