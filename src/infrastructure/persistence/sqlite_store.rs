use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use tokio::task;

use crate::domain::entities::dataset::Dataset;
use crate::domain::entities::factor::ExternalFactor;
use crate::domain::entities::order::{OrderLineItem, OrderRecord, OrderStatus};
use crate::domain::entities::product::ProductSnapshot;
use crate::domain::entities::sales::SalesRecord;
use crate::domain::entities::snapshot::{AnalyticsSnapshot, CachedSnapshot, SNAPSHOT_SCHEMA_VERSION};
use crate::domain::ports::source::{Collection, DataSource, SourceError};
use crate::domain::ports::store::{SnapshotStore, StoreError};
use crate::domain::value_objects::tenant::TenantId;

use super::migrations;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Row counts written by [`SqliteStore::import_dataset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub sales: usize,
    pub products: usize,
    pub orders: usize,
    pub external_factors: usize,
}

/// SQLite-backed operational data store and snapshot cache.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Create a new `SQLite` store at the given path.
    ///
    /// Expands `~`, creates parent directories, opens connection,
    /// sets WAL mode and pragmas, and initializes schema.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if the database cannot be opened or initialized.
    pub fn new(path: &str) -> Result<Self, StoreError> {
        let expanded = shellexpand::tilde(path);
        let db_path = PathBuf::from(expanded.as_ref());

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        }

        let conn =
            Connection::open(&db_path).map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        conn.pragma_update(None, "busy_timeout", 5000)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        migrations::initialize_schema(&conn).map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Load a tenant's dataset in a single transaction.
    ///
    /// Products and orders are upserted by id; an order's line items are
    /// replaced. The dataset is authoritative for the dates it covers:
    /// stored sales and external factors inside its date span are replaced,
    /// so importing the same file twice leaves history unchanged. Factors of
    /// unknown kind carry no date and are skipped.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if any insert fails. Nothing is
    /// written in that case.
    pub fn import_dataset(
        &self,
        tenant: &TenantId,
        dataset: &Dataset,
    ) -> Result<ImportSummary, StoreError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?;
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        let mut summary = ImportSummary::default();

        for product in &dataset.products {
            tx.execute(
                "INSERT INTO products
                    (tenant_id, product_id, name, category, current_stock, unit_price, expiration_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(tenant_id, product_id) DO UPDATE SET
                    name = excluded.name,
                    category = excluded.category,
                    current_stock = excluded.current_stock,
                    unit_price = excluded.unit_price,
                    expiration_date = excluded.expiration_date",
                params![
                    tenant.as_str(),
                    product.product_id,
                    product.name,
                    product.category,
                    product.current_stock,
                    product.unit_price,
                    product
                        .expiration_date
                        .map(|d| d.format(DATE_FORMAT).to_string()),
                ],
            )
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
            summary.products += 1;
        }

        if let Some((first, last)) = date_span(dataset.sales.iter().map(|s| s.date)) {
            clear_span(&tx, "sales", "sale_date", tenant, first, last)?;
        }
        for sale in &dataset.sales {
            tx.execute(
                "INSERT INTO sales
                    (tenant_id, product_id, sale_date, quantity_sold, unit_price, total_amount)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    tenant.as_str(),
                    sale.product_id,
                    sale.date.format(DATE_FORMAT).to_string(),
                    sale.quantity_sold,
                    sale.unit_price,
                    sale.total_amount,
                ],
            )
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
            summary.sales += 1;
        }

        for order in &dataset.orders {
            tx.execute(
                "INSERT INTO orders (tenant_id, order_id, created_at, status)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(tenant_id, order_id) DO UPDATE SET
                    created_at = excluded.created_at,
                    status = excluded.status",
                params![
                    tenant.as_str(),
                    order.order_id,
                    order.created_at.to_rfc3339(),
                    status_label(order.status),
                ],
            )
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
            tx.execute(
                "DELETE FROM order_items WHERE tenant_id = ?1 AND order_id = ?2",
                params![tenant.as_str(), order.order_id],
            )
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
            for item in &order.line_items {
                tx.execute(
                    "INSERT INTO order_items (tenant_id, order_id, product_id, quantity, amount)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        tenant.as_str(),
                        order.order_id,
                        item.product_id,
                        item.quantity,
                        item.amount,
                    ],
                )
                .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
            }
            summary.orders += 1;
        }

        if let Some((first, last)) =
            date_span(dataset.external_factors.iter().filter_map(ExternalFactor::date))
        {
            clear_span(&tx, "external_factors", "factor_date", tenant, first, last)?;
        }
        for factor in &dataset.external_factors {
            let Some(date) = factor.date() else {
                tracing::debug!("skipping external factor of unknown kind");
                continue;
            };
            let data =
                serde_json::to_string(factor).map_err(|e| StoreError::WriteFailed(e.to_string()))?;
            tx.execute(
                "INSERT INTO external_factors (tenant_id, factor_date, data) VALUES (?1, ?2, ?3)",
                params![tenant.as_str(), date.format(DATE_FORMAT).to_string(), data],
            )
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
            summary.external_factors += 1;
        }

        tx.commit()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        Ok(summary)
    }

    /// Run a read on the blocking pool so a slow query never stalls the
    /// runtime and the caller's timeout can still fire.
    async fn read_blocking<T, F>(&self, collection: Collection, read: F) -> Result<T, SourceError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| SourceError::Unreachable("lock poisoned".into()))?;
            read(&guard).map_err(query_failed(collection))
        })
        .await
        .map_err(|e| SourceError::Unreachable(format!("read task failed: {e}")))?
    }
}

fn date_span(dates: impl Iterator<Item = NaiveDate>) -> Option<(NaiveDate, NaiveDate)> {
    dates.fold(None, |span, date| match span {
        None => Some((date, date)),
        Some((first, last)) => Some((first.min(date), last.max(date))),
    })
}

fn clear_span(
    tx: &Transaction<'_>,
    table: &str,
    date_column: &str,
    tenant: &TenantId,
    first: NaiveDate,
    last: NaiveDate,
) -> Result<usize, StoreError> {
    tx.execute(
        &format!("DELETE FROM {table} WHERE tenant_id = ?1 AND {date_column} BETWEEN ?2 AND ?3"),
        params![
            tenant.as_str(),
            first.format(DATE_FORMAT).to_string(),
            last.format(DATE_FORMAT).to_string(),
        ],
    )
    .map_err(|e| StoreError::WriteFailed(e.to_string()))
}

fn query_failed(collection: Collection) -> impl Fn(rusqlite::Error) -> SourceError {
    move |e| SourceError::QueryFailed {
        collection,
        reason: e.to_string(),
    }
}

#[async_trait]
impl DataSource for SqliteStore {
    async fn sales_history(
        &self,
        tenant: &TenantId,
        since: NaiveDate,
    ) -> Result<Vec<SalesRecord>, SourceError> {
        let tenant = tenant.clone();
        self.read_blocking(Collection::Sales, move |conn| {
            read_sales(conn, &tenant, since)
        })
        .await
    }

    async fn products(&self, tenant: &TenantId) -> Result<Vec<ProductSnapshot>, SourceError> {
        let tenant = tenant.clone();
        self.read_blocking(Collection::Products, move |conn| read_products(conn, &tenant))
            .await
    }

    async fn recent_orders(
        &self,
        tenant: &TenantId,
        limit: usize,
    ) -> Result<Vec<OrderRecord>, SourceError> {
        let tenant = tenant.clone();
        self.read_blocking(Collection::Orders, move |conn| {
            read_orders(conn, &tenant, limit)
        })
        .await
    }

    async fn external_factors(
        &self,
        tenant: &TenantId,
        since: NaiveDate,
    ) -> Result<Vec<ExternalFactor>, SourceError> {
        let tenant = tenant.clone();
        self.read_blocking(Collection::ExternalFactors, move |conn| {
            read_factors(conn, &tenant, since)
        })
        .await
    }
}

fn read_sales(
    conn: &Connection,
    tenant: &TenantId,
    since: NaiveDate,
) -> Result<Vec<SalesRecord>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT product_id, sale_date, quantity_sold, unit_price, total_amount
         FROM sales WHERE tenant_id = ?1 AND sale_date >= ?2
         ORDER BY sale_date ASC, id ASC",
    )?;
    let rows = stmt.query_map(
        params![tenant.as_str(), since.format(DATE_FORMAT).to_string()],
        |row| {
            let date: String = row.get(1)?;
            Ok(SalesRecord {
                product_id: row.get(0)?,
                date: parse_date(1, &date)?,
                quantity_sold: row.get(2)?,
                unit_price: row.get(3)?,
                total_amount: row.get(4)?,
            })
        },
    )?;
    rows.collect()
}

fn read_products(
    conn: &Connection,
    tenant: &TenantId,
) -> Result<Vec<ProductSnapshot>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT product_id, name, category, current_stock, unit_price, expiration_date
         FROM products WHERE tenant_id = ?1 ORDER BY product_id ASC",
    )?;
    let rows = stmt.query_map(params![tenant.as_str()], |row| {
        let expiry: Option<String> = row.get(5)?;
        Ok(ProductSnapshot {
            product_id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            current_stock: row.get(3)?,
            unit_price: row.get(4)?,
            expiration_date: expiry.map(|raw| parse_date(5, &raw)).transpose()?,
        })
    })?;
    rows.collect()
}

fn read_orders(
    conn: &Connection,
    tenant: &TenantId,
    limit: usize,
) -> Result<Vec<OrderRecord>, rusqlite::Error> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut stmt = conn.prepare(
        "SELECT order_id, created_at, status FROM orders
         WHERE tenant_id = ?1
         ORDER BY created_at DESC, order_id ASC
         LIMIT ?2",
    )?;
    let headers = stmt
        .query_map(params![tenant.as_str(), limit], |row| {
            let created_at: String = row.get(1)?;
            let status: String = row.get(2)?;
            Ok((
                row.get::<_, String>(0)?,
                parse_timestamp(1, &created_at)?,
                parse_status(&status),
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut items_stmt = conn.prepare(
        "SELECT product_id, quantity, amount FROM order_items
         WHERE tenant_id = ?1 AND order_id = ?2 ORDER BY id ASC",
    )?;
    let mut orders = Vec::with_capacity(headers.len());
    for (order_id, created_at, status) in headers {
        let line_items = items_stmt
            .query_map(params![tenant.as_str(), order_id], |row| {
                Ok(OrderLineItem {
                    product_id: row.get(0)?,
                    quantity: row.get(1)?,
                    amount: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        orders.push(OrderRecord {
            order_id,
            created_at,
            line_items,
            status,
        });
    }
    Ok(orders)
}

fn read_factors(
    conn: &Connection,
    tenant: &TenantId,
    since: NaiveDate,
) -> Result<Vec<ExternalFactor>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT data FROM external_factors
         WHERE tenant_id = ?1 AND factor_date >= ?2
         ORDER BY factor_date ASC, id ASC",
    )?;
    let rows = stmt.query_map(
        params![tenant.as_str(), since.format(DATE_FORMAT).to_string()],
        |row| {
            let data: String = row.get(0)?;
            serde_json::from_str(&data)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
        },
    )?;
    rows.collect()
}

impl SnapshotStore for SqliteStore {
    fn save_snapshot(
        &self,
        tenant: &TenantId,
        snapshot: &CachedSnapshot,
    ) -> Result<(), StoreError> {
        let data = serde_json::to_string(&snapshot.snapshot)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?;

        conn.execute(
            "INSERT INTO analytics_snapshots
                (tenant_id, schema_version, input_version, computed_at, data)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(tenant_id) DO UPDATE SET
                schema_version = excluded.schema_version,
                input_version = excluded.input_version,
                computed_at = excluded.computed_at,
                data = excluded.data",
            params![
                tenant.as_str(),
                snapshot.schema_version,
                snapshot.input_version,
                snapshot.snapshot.last_updated.to_rfc3339(),
                data,
            ],
        )
        .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        Ok(())
    }

    fn get_latest_snapshot(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<CachedSnapshot>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))?;

        let row = conn
            .query_row(
                "SELECT schema_version, input_version, data
                 FROM analytics_snapshots WHERE tenant_id = ?1",
                params![tenant.as_str()],
                |row| {
                    Ok((
                        row.get::<_, u32>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;

        let Some((schema_version, input_version, data)) = row else {
            return Ok(None);
        };

        match serde_json::from_str::<AnalyticsSnapshot>(&data) {
            Ok(snapshot) => Ok(Some(CachedSnapshot {
                schema_version,
                input_version,
                snapshot,
            })),
            // Entries from an older layout are treated as a miss
            Err(e) if schema_version != SNAPSHOT_SCHEMA_VERSION => {
                tracing::debug!(tenant = %tenant, schema_version, "discarding stale snapshot: {e}");
                Ok(None)
            }
            Err(e) => Err(StoreError::ReadFailed(e.to_string())),
        }
    }
}

const fn status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "pending",
        OrderStatus::Completed => "completed",
        OrderStatus::Cancelled => "cancelled",
        OrderStatus::Refunded => "refunded",
        OrderStatus::Unknown => "unknown",
    }
}

fn parse_status(s: &str) -> OrderStatus {
    match s {
        "pending" => OrderStatus::Pending,
        "completed" => OrderStatus::Completed,
        "cancelled" => OrderStatus::Cancelled,
        "refunded" => OrderStatus::Refunded,
        _ => OrderStatus::Unknown,
    }
}

fn parse_date(idx: usize, raw: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_timestamp(idx: usize, raw: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
