use async_trait::async_trait;
use uuid::Uuid;
use sqlx::PgPool;
use rust_decimal::Decimal;
use printpilot_catalog::{Category, PriceListEntry, PriceListPatch};
use printpilot_core::{PriceListRepository, RepoResult, StoreError};
use crate::db_err;

pub struct StorePriceListRepository {
    pool: PgPool,
}

impl StorePriceListRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PriceListRow {
    id: Uuid,
    service_name: String,
    category: String,
    base_price: Decimal,
    unit: String,
    is_active: bool,
}

impl TryFrom<PriceListRow> for PriceListEntry {
    type Error = StoreError;

    fn try_from(row: PriceListRow) -> Result<Self, Self::Error> {
        let category: Category = row.category.parse().map_err(|_| StoreError::Corrupt {
            entity: "price list",
            detail: format!("unknown category '{}' on {}", row.category, row.id),
        })?;

        Ok(PriceListEntry {
            id: row.id,
            service_name: row.service_name,
            category,
            base_price: row.base_price,
            unit: row.unit,
            is_active: row.is_active,
        })
    }
}

const COLUMNS: &str = "id, service_name, category, base_price, unit, is_active";

#[async_trait]
impl PriceListRepository for StorePriceListRepository {
    async fn list_entries(&self) -> RepoResult<Vec<PriceListEntry>> {
        let rows = sqlx::query_as::<_, PriceListRow>(&format!(
            "SELECT {COLUMNS} FROM price_lists ORDER BY category, LOWER(service_name), id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(PriceListEntry::try_from).collect()
    }

    async fn get_entry(&self, id: Uuid) -> RepoResult<Option<PriceListEntry>> {
        let row = sqlx::query_as::<_, PriceListRow>(&format!(
            "SELECT {COLUMNS} FROM price_lists WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(PriceListEntry::try_from).transpose()
    }

    async fn create_entry(&self, entry: &PriceListEntry) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO price_lists (id, service_name, category, base_price, unit, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(entry.id)
        .bind(&entry.service_name)
        .bind(entry.category.as_str())
        .bind(entry.base_price)
        .bind(&entry.unit)
        .bind(entry.is_active)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn update_entry(&self, id: Uuid, patch: PriceListPatch) -> RepoResult<Option<PriceListEntry>> {
        let row = sqlx::query_as::<_, PriceListRow>(&format!(
            "UPDATE price_lists SET \
                service_name = COALESCE($2, service_name), \
                category = COALESCE($3, category), \
                base_price = COALESCE($4, base_price), \
                unit = COALESCE($5, unit), \
                is_active = COALESCE($6, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(patch.service_name)
        .bind(patch.category.map(|c| c.as_str()))
        .bind(patch.base_price)
        .bind(patch.unit)
        .bind(patch.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(PriceListEntry::try_from).transpose()
    }

    async fn delete_entry(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM price_lists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}
