use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::users::dto::{CreateUser, UpdateUser};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub city: Option<String>,
    pub language: Option<String>,
    #[serde(skip_serializing)]
    pub hashed_password: String,
}

const COLUMNS: &str = "id, firstname, lastname, email, city, language, hashed_password";

impl User {
    pub async fn list(db: &PgPool, language: Option<&str>) -> sqlx::Result<Vec<User>> {
        match language {
            Some(language) => {
                let sql = format!("SELECT {COLUMNS} FROM users WHERE language = $1 ORDER BY id");
                sqlx::query_as::<_, User>(&sql)
                    .bind(language)
                    .fetch_all(db)
                    .await
            }
            None => {
                let sql = format!("SELECT {COLUMNS} FROM users ORDER BY id");
                sqlx::query_as::<_, User>(&sql).fetch_all(db).await
            }
        }
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> sqlx::Result<Option<User>> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(db).await
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(db)
            .await
    }

    pub async fn insert(db: &PgPool, input: &CreateUser, hashed_password: &str) -> sqlx::Result<User> {
        let sql = format!(
            "INSERT INTO users (firstname, lastname, email, city, language, hashed_password)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&input.firstname)
            .bind(&input.lastname)
            .bind(&input.email)
            .bind(&input.city)
            .bind(&input.language)
            .bind(hashed_password)
            .fetch_one(db)
            .await
    }

    /// Persist a fully merged row (see [`User::merged`]). The digest column
    /// is never touched here.
    pub async fn update(&self, db: &PgPool) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET firstname = $1, lastname = $2, email = $3, city = $4, language = $5
            WHERE id = $6
            "#,
        )
        .bind(&self.firstname)
        .bind(&self.lastname)
        .bind(&self.email)
        .bind(&self.city)
        .bind(&self.language)
        .bind(self.id)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn delete(db: &PgPool, id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }

    /// Apply the supplied fields over this row; untouched fields keep their
    /// prior values.
    pub fn merged(mut self, update: UpdateUser) -> User {
        if let Some(firstname) = update.firstname {
            self.firstname = firstname;
        }
        if let Some(lastname) = update.lastname {
            self.lastname = lastname;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(city) = update.city {
            self.city = Some(city);
        }
        if let Some(language) = update.language {
            self.language = Some(language);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_preserves_fields_not_supplied() {
        let existing = User {
            id: 3,
            firstname: "A".into(),
            lastname: "B".into(),
            email: "a@b.com".into(),
            city: None,
            language: None,
            hashed_password: "digest".into(),
        };
        let merged = existing.merged(UpdateUser {
            city: Some("Paris".into()),
            ..UpdateUser::default()
        });
        assert_eq!(merged.city.as_deref(), Some("Paris"));
        assert_eq!(merged.firstname, "A");
        assert_eq!(merged.lastname, "B");
        assert_eq!(merged.email, "a@b.com");
        assert_eq!(merged.hashed_password, "digest");
    }
}
