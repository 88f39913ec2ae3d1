use rusqlite::Connection;

/// Initialize the database schema, creating tables if they don't exist.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS sales (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            tenant_id      TEXT    NOT NULL,
            product_id     TEXT    NOT NULL,
            sale_date      TEXT    NOT NULL,
            quantity_sold  REAL    NOT NULL,
            unit_price     REAL    NOT NULL,
            total_amount   REAL    NOT NULL
        );

        CREATE TABLE IF NOT EXISTS products (
            tenant_id        TEXT NOT NULL,
            product_id       TEXT NOT NULL,
            name             TEXT NOT NULL,
            category         TEXT NOT NULL,
            current_stock    REAL NOT NULL,
            unit_price       REAL NOT NULL,
            expiration_date  TEXT,
            PRIMARY KEY (tenant_id, product_id)
        );

        CREATE TABLE IF NOT EXISTS orders (
            tenant_id   TEXT NOT NULL,
            order_id    TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            status      TEXT NOT NULL,
            PRIMARY KEY (tenant_id, order_id)
        );

        CREATE TABLE IF NOT EXISTS order_items (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            tenant_id   TEXT NOT NULL,
            order_id    TEXT NOT NULL,
            product_id  TEXT NOT NULL,
            quantity    REAL NOT NULL,
            amount      REAL NOT NULL,
            FOREIGN KEY (tenant_id, order_id)
                REFERENCES orders (tenant_id, order_id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS external_factors (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            tenant_id    TEXT NOT NULL,
            factor_date  TEXT NOT NULL,
            data         TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS analytics_snapshots (
            tenant_id       TEXT    PRIMARY KEY,
            schema_version  INTEGER NOT NULL,
            input_version   TEXT    NOT NULL,
            computed_at     TEXT    NOT NULL,
            data            TEXT    NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sales_tenant_date ON sales(tenant_id, sale_date);
        CREATE INDEX IF NOT EXISTS idx_orders_tenant_created ON orders(tenant_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_order_items_order ON order_items(tenant_id, order_id);
        CREATE INDEX IF NOT EXISTS idx_external_factors_tenant_date
            ON external_factors(tenant_id, factor_date);",
    )?;
    Ok(())
}
