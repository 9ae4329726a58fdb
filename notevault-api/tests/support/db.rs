use notevault_api::{ApiResult, DbClient, DbConfig};

const SCHEMA: &str = include_str!("../../sql/schema.sql");

/// Connect with `PG_*` settings and make sure the `note` table exists.
pub async fn test_db_client() -> ApiResult<DbClient> {
    let config = DbConfig::from_env()?;
    let db = DbClient::from_config(&config)?;
    db.execute_batch(SCHEMA).await?;
    Ok(db)
}
