use sqlx::{Pool, Postgres};

use crate::micropost::{errors::MicropostError, types::Micropost};
use crate::storage::validate_postgres_table_schema;
use crate::userdb::DB_TABLE_USERS;

use super::config::DB_TABLE_MICROPOSTS;

pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), MicropostError> {
    let table_name = DB_TABLE_MICROPOSTS.as_str();
    let users_table = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id BIGSERIAL PRIMARY KEY,
            content TEXT NOT NULL,
            user_id BIGINT NOT NULL REFERENCES {users_table}(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"
        CREATE INDEX IF NOT EXISTS idx_{table_name}_user_id_created_at
        ON {table_name}(user_id, created_at)
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn validate_micropost_tables_postgres(
    pool: &Pool<Postgres>,
) -> Result<(), MicropostError> {
    let expected_columns = [
        ("id", "bigint"),
        ("content", "text"),
        ("user_id", "bigint"),
        ("created_at", "timestamp with time zone"),
        ("updated_at", "timestamp with time zone"),
    ];

    validate_postgres_table_schema(
        pool,
        DB_TABLE_MICROPOSTS.as_str(),
        &expected_columns,
        MicropostError::Storage,
    )
    .await
}

pub(super) async fn insert_micropost_postgres(
    pool: &Pool<Postgres>,
    user_id: i64,
    content: &str,
) -> Result<Micropost, MicropostError> {
    let table_name = DB_TABLE_MICROPOSTS.as_str();
    let now = chrono::Utc::now();

    let micropost = sqlx::query_as::<_, Micropost>(&format!(
        r#"
        INSERT INTO {table_name} (content, user_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#
    ))
    .bind(content)
    .bind(user_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(micropost)
}

pub(super) async fn get_micropost_postgres(
    pool: &Pool<Postgres>,
    id: i64,
) -> Result<Option<Micropost>, MicropostError> {
    let table_name = DB_TABLE_MICROPOSTS.as_str();

    let micropost =
        sqlx::query_as::<_, Micropost>(&format!("SELECT * FROM {table_name} WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(micropost)
}

pub(super) async fn delete_micropost_postgres(
    pool: &Pool<Postgres>,
    id: i64,
) -> Result<bool, MicropostError> {
    let table_name = DB_TABLE_MICROPOSTS.as_str();

    let result = sqlx::query(&format!("DELETE FROM {table_name} WHERE id = $1"))
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub(super) async fn list_microposts_by_user_postgres(
    pool: &Pool<Postgres>,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<Micropost>, MicropostError> {
    let table_name = DB_TABLE_MICROPOSTS.as_str();

    let microposts = sqlx::query_as::<_, Micropost>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(microposts)
}

pub(super) async fn count_microposts_by_user_postgres(
    pool: &Pool<Postgres>,
    user_id: i64,
) -> Result<i64, MicropostError> {
    let table_name = DB_TABLE_MICROPOSTS.as_str();

    let count: i64 =
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table_name} WHERE user_id = $1"))
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}

pub(super) async fn count_microposts_postgres(pool: &Pool<Postgres>) -> Result<i64, MicropostError> {
    let table_name = DB_TABLE_MICROPOSTS.as_str();

    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table_name}"))
        .fetch_one(pool)
        .await?;

    Ok(count)
}
