use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};

use super::{Store, StoreError, StoreResult};
use crate::models::{NewProduct, Product};

/// [`Store`] over a Postgres pool. Every operation borrows its own
/// connection for a single statement and hands it back when the guard drops.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn connection(&self) -> StoreResult<PoolConnection<Postgres>> {
        self.pool.acquire().await.map_err(StoreError::Connection)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create(&self, product: &NewProduct) -> StoreResult<Product> {
        let mut conn = self.connection().await?;

        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, stock) VALUES ($1, $2) RETURNING id, name, stock",
        )
        .bind(&product.name)
        .bind(product.stock)
        .fetch_one(&mut *conn)
        .await?;

        Ok(product)
    }

    async fn read_all(&self) -> StoreResult<Vec<Product>> {
        let mut conn = self.connection().await?;

        let products =
            sqlx::query_as::<_, Product>("SELECT id, name, stock FROM products ORDER BY id")
                .fetch_all(&mut *conn)
                .await?;

        Ok(products)
    }

    async fn read(&self, id: i64) -> StoreResult<Product> {
        let mut conn = self.connection().await?;

        sqlx::query_as::<_, Product>("SELECT id, name, stock FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, id: i64, product: &NewProduct) -> StoreResult<Product> {
        let mut conn = self.connection().await?;

        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name  = $1,
                stock = $2
            WHERE id = $3
            RETURNING id, name, stock
            "#,
        )
        .bind(&product.name)
        .bind(product.stock)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let mut conn = self.connection().await?;

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
