use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{MaterialKind, StudyMaterial},
    error::{AppError, Result},
    repository::StudyMaterialRepository,
};

#[derive(FromRow)]
struct MaterialRow {
    id: String,
    title: String,
    description: String,
    link: String,
    batch: String,
    kind: String,
    created_by: String,
    created_by_name: String,
    created_at: NaiveDateTime,
}

pub struct SqliteStudyMaterialRepository {
    pool: SqlitePool,
}

impl SqliteStudyMaterialRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_material(row: MaterialRow) -> Result<StudyMaterial> {
        Ok(StudyMaterial {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            description: row.description,
            link: row.link,
            batch: row.batch,
            kind: MaterialKind::parse(&row.kind).unwrap_or(MaterialKind::Notes),
            created_by: Uuid::parse_str(&row.created_by)
                .map_err(|e| AppError::Database(e.to_string()))?,
            created_by_name: row.created_by_name,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl StudyMaterialRepository for SqliteStudyMaterialRepository {
    async fn create(&self, material: StudyMaterial) -> Result<StudyMaterial> {
        sqlx::query(
            r#"
            INSERT INTO study_materials (
                id, title, description, link, batch, kind, created_by,
                created_by_name, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(material.id.to_string())
        .bind(&material.title)
        .bind(&material.description)
        .bind(&material.link)
        .bind(&material.batch)
        .bind(material.kind.as_str())
        .bind(material.created_by.to_string())
        .bind(&material.created_by_name)
        .bind(material.created_at.naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(material)
    }

    async fn list_for_batch(&self, batch: &str, limit: i64) -> Result<Vec<StudyMaterial>> {
        let rows = sqlx::query_as::<_, MaterialRow>(
            r#"
            SELECT id, title, description, link, batch, kind, created_by,
                   created_by_name, created_at
            FROM study_materials
            WHERE batch IN (?, 'all')
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(batch)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_material).collect()
    }

    async fn list_assignments_for_batch(&self, batch: &str) -> Result<Vec<StudyMaterial>> {
        let rows = sqlx::query_as::<_, MaterialRow>(
            r#"
            SELECT id, title, description, link, batch, kind, created_by,
                   created_by_name, created_at
            FROM study_materials
            WHERE kind = 'assignment' AND batch = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(batch)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_material).collect()
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<StudyMaterial>> {
        let rows = sqlx::query_as::<_, MaterialRow>(
            r#"
            SELECT id, title, description, link, batch, kind, created_by,
                   created_by_name, created_at
            FROM study_materials
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_material).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM study_materials WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
