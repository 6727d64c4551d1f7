use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::movies::dto::{CreateMovie, UpdateMovie};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub director: String,
    pub year: i32,
    pub color: bool,
    pub duration: f64,
}

/// Optional list filters, composed as a parameterized predicate list joined
/// with AND. Values are always bound, never spliced into the SQL text.
#[derive(Debug, Default, Clone, Copy)]
pub struct MovieFilter {
    pub color: Option<bool>,
    pub max_duration: Option<f64>,
}

impl MovieFilter {
    /// SQL predicates in bind order, with 1-indexed placeholders.
    pub fn predicates(&self) -> Vec<String> {
        let mut preds = Vec::new();
        if self.color.is_some() {
            preds.push(format!("color = ${}", preds.len() + 1));
        }
        if self.max_duration.is_some() {
            preds.push(format!("duration <= ${}", preds.len() + 1));
        }
        preds
    }

    pub fn where_clause(&self) -> String {
        let preds = self.predicates();
        if preds.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", preds.join(" AND "))
        }
    }
}

impl Movie {
    pub async fn list(db: &PgPool, filter: &MovieFilter) -> sqlx::Result<Vec<Movie>> {
        let sql = format!(
            "SELECT id, title, director, year, color, duration FROM movies{} ORDER BY id",
            filter.where_clause()
        );
        let mut query = sqlx::query_as::<_, Movie>(&sql);
        if let Some(color) = filter.color {
            query = query.bind(color);
        }
        if let Some(max_duration) = filter.max_duration {
            query = query.bind(max_duration);
        }
        query.fetch_all(db).await
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> sqlx::Result<Option<Movie>> {
        sqlx::query_as::<_, Movie>(
            r#"
            SELECT id, title, director, year, color, duration
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn insert(db: &PgPool, input: &CreateMovie) -> sqlx::Result<Movie> {
        sqlx::query_as::<_, Movie>(
            r#"
            INSERT INTO movies (title, director, year, color, duration)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, director, year, color, duration
            "#,
        )
        .bind(&input.title)
        .bind(&input.director)
        .bind(input.year)
        .bind(input.color)
        .bind(input.duration)
        .fetch_one(db)
        .await
    }

    /// Persist a fully merged row (see [`Movie::merged`]).
    pub async fn update(&self, db: &PgPool) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            UPDATE movies
            SET title = $1, director = $2, year = $3, color = $4, duration = $5
            WHERE id = $6
            "#,
        )
        .bind(&self.title)
        .bind(&self.director)
        .bind(self.year)
        .bind(self.color)
        .bind(self.duration)
        .bind(self.id)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn delete(db: &PgPool, id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }

    /// Apply the supplied fields over this row; untouched fields keep their
    /// prior values.
    pub fn merged(mut self, update: UpdateMovie) -> Movie {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(director) = update.director {
            self.director = director;
        }
        if let Some(year) = update.year {
            self.year = year;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(duration) = update.duration {
            self.duration = duration;
        }
        self
    }
}
