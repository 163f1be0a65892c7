//! Repository for the `profiles` table.

use formstep_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::Profile;

const COLUMNS: &str = "id, role, created_at, updated_at";

/// Provides lookups for user profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Find a profile by its id (the identity provider's subject).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a profile or change the role of an existing one.
    pub async fn upsert(pool: &PgPool, id: DbId, role: &str) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (id, role) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET role = EXCLUDED.role \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(role)
            .fetch_one(pool)
            .await
    }
}
