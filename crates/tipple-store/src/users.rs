// SPDX-License-Identifier: Apache-2.0
//! Credential store: registration, verification, session-user lookup.

use rusqlite::{params, Connection, OptionalExtension};

use tipple_model::{Cocktail, Email, User, Username};

use crate::{credential, StoreError};

fn decode_user(id: i64, username: &str, email: &str) -> Result<User, StoreError> {
    Ok(User {
        id,
        username: Username::parse(username)
            .map_err(|e| StoreError::Sql(format!("corrupt user row {id}: {e}")))?,
        email: Email::parse(email)
            .map_err(|e| StoreError::Sql(format!("corrupt user row {id}: {e}")))?,
    })
}

/// Insert a new identity. Duplicate username or email is rejected by
/// the UNIQUE constraints and surfaced as one generic conflict; there
/// is no pre-check, so concurrent registrations cannot race past it.
pub fn register(
    conn: &Connection,
    username: &Username,
    email: &Email,
    password: &str,
) -> Result<User, StoreError> {
    let password_hash = credential::hash_password(password)?;
    let inserted = conn.execute(
        "INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, ?3)",
        params![username.as_str(), email.as_str(), password_hash],
    );
    match inserted {
        Ok(_) => Ok(User {
            id: conn.last_insert_rowid(),
            username: username.clone(),
            email: email.clone(),
        }),
        Err(e) => match StoreError::from(e) {
            StoreError::Conflict(_) => {
                Err(StoreError::Conflict("username or email already taken".to_string()))
            }
            other => Err(other),
        },
    }
}

/// Check a credential pair. Returns `None` for both unknown usernames
/// and wrong passwords; the unknown-user path still runs a hash
/// verification so the two are not distinguishable by response shape
/// or work done.
pub fn verify(
    conn: &Connection,
    username: &str,
    password: &str,
) -> Result<Option<User>, StoreError> {
    let row: Option<(i64, String, String, String)> = conn
        .prepare_cached(
            "SELECT id, username, email, password_hash FROM users WHERE username = ?1",
        )?
        .query_row([username], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })
        .optional()?;

    match row {
        Some((id, username, email, password_hash)) => {
            if credential::verify_password(&password_hash, password) {
                Ok(Some(decode_user(id, &username, &email)?))
            } else {
                Ok(None)
            }
        }
        None => {
            let _ = credential::verify_password(credential::dummy_hash(), password);
            Ok(None)
        }
    }
}

pub fn get_user(conn: &Connection, id: i64) -> Result<Option<User>, StoreError> {
    let row: Option<(i64, String, String)> = conn
        .prepare_cached("SELECT id, username, email FROM users WHERE id = ?1")?
        .query_row([id], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .optional()?;
    row.map(|(id, username, email)| decode_user(id, &username, &email))
        .transpose()
}

pub fn liked_cocktails(conn: &Connection, user_id: i64) -> Result<Vec<Cocktail>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT c.id, c.name, c.instructions, c.image_url, c.glass_type
         FROM likes l JOIN cocktails c ON c.id = l.cocktail_id
         WHERE l.user_id = ?1 ORDER BY c.id",
    )?;
    let rows = stmt
        .query_map([user_id], |row| {
            Ok(Cocktail {
                id: row.get(0)?,
                name: row.get(1)?,
                instructions: row.get(2)?,
                image_url: row.get(3)?,
                glass_type: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
