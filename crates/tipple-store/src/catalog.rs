// SPDX-License-Identifier: Apache-2.0
//! Cocktail CRUD and ingredient resolution.

use rusqlite::{params, Connection, OptionalExtension, Transaction};
use tracing::debug;

use tipple_model::{
    Cocktail, CocktailGraph, CocktailIngredient, CocktailPatch, Ingredient, IngredientLink,
    IngredientName, IngredientSpec, NewCocktail, Rating, Review, User,
};

use crate::StoreError;

fn row_to_cocktail(row: &rusqlite::Row<'_>) -> rusqlite::Result<Cocktail> {
    Ok(Cocktail {
        id: row.get(0)?,
        name: row.get(1)?,
        instructions: row.get(2)?,
        image_url: row.get(3)?,
        glass_type: row.get(4)?,
    })
}

pub fn list_cocktails(conn: &Connection) -> Result<Vec<Cocktail>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, instructions, image_url, glass_type FROM cocktails ORDER BY id",
    )?;
    let rows = stmt
        .query_map([], row_to_cocktail)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub(crate) fn fetch_cocktail(conn: &Connection, id: i64) -> Result<Cocktail, StoreError> {
    conn.prepare_cached(
        "SELECT id, name, instructions, image_url, glass_type FROM cocktails WHERE id = ?1",
    )?
    .query_row([id], row_to_cocktail)
    .optional()?
    .ok_or(StoreError::NotFound("cocktail"))
}

pub(crate) fn fetch_reviews(
    conn: &Connection,
    cocktail_id: i64,
) -> Result<Vec<(Review, User)>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT r.id, r.content, r.rating, r.user_id, r.cocktail_id, u.username, u.email
         FROM reviews r JOIN users u ON u.id = r.user_id
         WHERE r.cocktail_id = ?1 ORDER BY r.id",
    )?;
    let raw: Vec<(i64, String, i64, i64, i64, String, String)> = stmt
        .query_map([cocktail_id], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    raw.into_iter()
        .map(|(id, content, rating, user_id, cocktail_id, username, email)| {
            let review = Review {
                id,
                content,
                rating: Rating::parse(rating)
                    .map_err(|e| StoreError::Sql(format!("corrupt review row {id}: {e}")))?,
                user_id,
                cocktail_id,
            };
            let user = User {
                id: user_id,
                username: tipple_model::Username::parse(&username)
                    .map_err(|e| StoreError::Sql(format!("corrupt user row {user_id}: {e}")))?,
                email: tipple_model::Email::parse(&email)
                    .map_err(|e| StoreError::Sql(format!("corrupt user row {user_id}: {e}")))?,
            };
            Ok((review, user))
        })
        .collect()
}

fn fetch_ingredient_links(
    conn: &Connection,
    cocktail_id: i64,
) -> Result<Vec<IngredientLink>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT ci.id, ci.cocktail_id, ci.ingredient_id, ci.amount, i.name
         FROM cocktail_ingredients ci JOIN ingredients i ON i.id = ci.ingredient_id
         WHERE ci.cocktail_id = ?1 ORDER BY ci.id",
    )?;
    let raw: Vec<(i64, i64, i64, String, String)> = stmt
        .query_map([cocktail_id], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    raw.into_iter()
        .map(|(id, cocktail_id, ingredient_id, amount, name)| {
            Ok(IngredientLink {
                link: CocktailIngredient {
                    id,
                    cocktail_id,
                    ingredient_id,
                    amount,
                },
                ingredient: Ingredient {
                    id: ingredient_id,
                    name: IngredientName::parse(&name).map_err(|e| {
                        StoreError::Sql(format!("corrupt ingredient row {ingredient_id}: {e}"))
                    })?,
                },
            })
        })
        .collect()
}

fn fetch_liked_by(conn: &Connection, cocktail_id: i64) -> Result<Vec<User>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT u.id, u.username, u.email
         FROM likes l JOIN users u ON u.id = l.user_id
         WHERE l.cocktail_id = ?1 ORDER BY u.id",
    )?;
    let raw: Vec<(i64, String, String)> = stmt
        .query_map([cocktail_id], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    raw.into_iter()
        .map(|(id, username, email)| {
            Ok(User {
                id,
                username: tipple_model::Username::parse(&username)
                    .map_err(|e| StoreError::Sql(format!("corrupt user row {id}: {e}")))?,
                email: tipple_model::Email::parse(&email)
                    .map_err(|e| StoreError::Sql(format!("corrupt user row {id}: {e}")))?,
            })
        })
        .collect()
}

/// Load a cocktail with all three edge sets joined in.
pub fn get_cocktail(conn: &Connection, id: i64) -> Result<CocktailGraph, StoreError> {
    let cocktail = fetch_cocktail(conn, id)?;
    Ok(CocktailGraph {
        reviews: fetch_reviews(conn, id)?,
        ingredients: fetch_ingredient_links(conn, id)?,
        liked_by: fetch_liked_by(conn, id)?,
        cocktail,
    })
}

/// Look up an ingredient by exact name, creating it when absent. A
/// concurrent insert of the same name loses to the UNIQUE constraint
/// and falls back to re-reading the winner's row.
fn resolve_or_create_ingredient(
    tx: &Transaction<'_>,
    name: &IngredientName,
) -> Result<i64, StoreError> {
    let existing: Option<i64> = tx
        .prepare_cached("SELECT id FROM ingredients WHERE name = ?1")?
        .query_row([name.as_str()], |row| row.get(0))
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }

    match tx.execute("INSERT INTO ingredients (name) VALUES (?1)", [name.as_str()]) {
        Ok(_) => Ok(tx.last_insert_rowid()),
        Err(e) => match StoreError::from(e) {
            StoreError::Conflict(_) => tx
                .prepare_cached("SELECT id FROM ingredients WHERE name = ?1")?
                .query_row([name.as_str()], |row| row.get(0))
                .optional()?
                .ok_or_else(|| StoreError::Sql("ingredient vanished mid-insert".to_string())),
            other => Err(other),
        },
    }
}

fn insert_links(
    tx: &Transaction<'_>,
    cocktail_id: i64,
    specs: &[IngredientSpec],
) -> Result<(), StoreError> {
    for spec in specs {
        let ingredient_id = resolve_or_create_ingredient(tx, &spec.name)?;
        tx.execute(
            "INSERT INTO cocktail_ingredients (cocktail_id, ingredient_id, amount)
             VALUES (?1, ?2, ?3)",
            params![cocktail_id, ingredient_id, spec.amount],
        )?;
    }
    Ok(())
}

pub fn create_cocktail(
    conn: &mut Connection,
    new: &NewCocktail,
) -> Result<CocktailGraph, StoreError> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO cocktails (name, instructions, image_url, glass_type)
         VALUES (?1, ?2, ?3, ?4)",
        params![new.name, new.instructions, new.image_url, new.glass_type],
    )?;
    let id = tx.last_insert_rowid();
    insert_links(&tx, id, &new.ingredients)?;
    tx.commit()?;
    debug!(cocktail_id = id, "cocktail created");
    get_cocktail(conn, id)
}

/// Apply a partial update. Scalar fields are written only when present
/// in the patch; `ingredients: Some(_)` replaces the full link set,
/// which for an empty list leaves the cocktail with no ingredients.
pub fn update_cocktail(
    conn: &mut Connection,
    id: i64,
    patch: &CocktailPatch,
) -> Result<CocktailGraph, StoreError> {
    let tx = conn.transaction()?;
    let exists: Option<i64> = tx
        .prepare_cached("SELECT id FROM cocktails WHERE id = ?1")?
        .query_row([id], |row| row.get(0))
        .optional()?;
    if exists.is_none() {
        return Err(StoreError::NotFound("cocktail"));
    }

    let mut sets: Vec<&'static str> = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
    if let Some(name) = &patch.name {
        sets.push("name = ?");
        values.push(Box::new(name.clone()));
    }
    if let Some(instructions) = &patch.instructions {
        sets.push("instructions = ?");
        values.push(Box::new(instructions.clone()));
    }
    if let Some(image_url) = &patch.image_url {
        sets.push("image_url = ?");
        values.push(Box::new(image_url.clone()));
    }
    if let Some(glass_type) = &patch.glass_type {
        sets.push("glass_type = ?");
        values.push(Box::new(glass_type.clone()));
    }
    if !sets.is_empty() {
        let sql = format!("UPDATE cocktails SET {} WHERE id = ?", sets.join(", "));
        values.push(Box::new(id));
        let params = values
            .iter()
            .map(|v| v.as_ref() as &dyn rusqlite::ToSql)
            .collect::<Vec<_>>();
        tx.execute(&sql, params.as_slice())?;
    }

    if let Some(specs) = &patch.ingredients {
        tx.execute(
            "DELETE FROM cocktail_ingredients WHERE cocktail_id = ?1",
            [id],
        )?;
        insert_links(&tx, id, specs)?;
    }

    tx.commit()?;
    debug!(cocktail_id = id, "cocktail updated");
    get_cocktail(conn, id)
}

/// Delete a cocktail; its link rows, reviews, and likes go with it.
/// Ingredient rows stay, other cocktails may reference them.
pub fn delete_cocktail(conn: &Connection, id: i64) -> Result<(), StoreError> {
    let deleted = conn.execute("DELETE FROM cocktails WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(StoreError::NotFound("cocktail"));
    }
    debug!(cocktail_id = id, "cocktail deleted");
    Ok(())
}

pub fn list_ingredients(conn: &Connection) -> Result<Vec<Ingredient>, StoreError> {
    let mut stmt = conn.prepare_cached("SELECT id, name FROM ingredients ORDER BY id")?;
    let raw: Vec<(i64, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    raw.into_iter()
        .map(|(id, name)| {
            Ok(Ingredient {
                id,
                name: IngredientName::parse(&name)
                    .map_err(|e| StoreError::Sql(format!("corrupt ingredient row {id}: {e}")))?,
            })
        })
        .collect()
}

pub fn get_ingredient(conn: &Connection, id: i64) -> Result<Ingredient, StoreError> {
    let raw: Option<(i64, String)> = conn
        .prepare_cached("SELECT id, name FROM ingredients WHERE id = ?1")?
        .query_row([id], |row| Ok((row.get(0)?, row.get(1)?)))
        .optional()?;
    let (id, name) = raw.ok_or(StoreError::NotFound("ingredient"))?;
    Ok(Ingredient {
        id,
        name: IngredientName::parse(&name)
            .map_err(|e| StoreError::Sql(format!("corrupt ingredient row {id}: {e}")))?,
    })
}
