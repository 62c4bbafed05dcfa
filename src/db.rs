use sqlx::SqlitePool;

/// Creates the inventory tables and indexes if they do not exist yet.
///
/// Uniqueness of category codes, product codes, barcodes, user groups and employee ids
/// is enforced here; handlers map the resulting constraint errors to `409 Conflict`.
pub async fn init_db(pool: &SqlitePool) -> anyhow::Result<()> {
    if let Err(e) = sqlx::query("PRAGMA journal_mode=WAL;").execute(pool).await {
        tracing::warn!("Failed to set WAL journal mode: {}", e);
    }
    if let Err(e) = sqlx::query("PRAGMA synchronous=NORMAL;").execute(pool).await {
        tracing::warn!("Failed to set synchronous mode: {}", e);
    }
    // Foreign keys are critical - fail if this doesn't work
    sqlx::query("PRAGMA foreign_keys=ON;").execute(pool).await?;
    if let Err(e) = sqlx::query("PRAGMA busy_timeout=10000;").execute(pool).await {
        tracing::warn!("Failed to set busy_timeout: {}", e);
    }

    // employees
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS user_groups (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            "group" TEXT NOT NULL UNIQUE,
            description TEXT NULL,
            date_created TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ','now'))
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id TEXT NOT NULL UNIQUE,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            personal_email TEXT NULL,
            company_email TEXT NOT NULL,
            user_group_id INTEGER NOT NULL,
            status TEXT NOT NULL CHECK (length(status) = 1),
            date_created TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ','now')),
            FOREIGN KEY(user_group_id) REFERENCES user_groups(id)
        )"#,
    )
    .execute(pool)
    .await?;

    // products
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS product_category (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE,
            category TEXT NOT NULL,
            description TEXT NULL,
            date_created TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ','now')),
            date_updated TEXT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS financial_quarters (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            year INTEGER NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            description TEXT NULL,
            date_created TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ','now'))
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_name TEXT NOT NULL,
            product_code TEXT NOT NULL UNIQUE,
            barcode TEXT NOT NULL UNIQUE,
            barcode_type TEXT NOT NULL,
            description TEXT NOT NULL,
            category_id INTEGER NOT NULL,
            selling_price REAL NOT NULL,
            stock_count INTEGER NOT NULL DEFAULT 0,
            reorder_level INTEGER NOT NULL DEFAULT 0,
            date_added TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ','now')),
            date_modified TEXT NULL,
            financial_quarter_id INTEGER NOT NULL,
            FOREIGN KEY(category_id) REFERENCES product_category(id),
            FOREIGN KEY(financial_quarter_id) REFERENCES financial_quarters(id),
            CONSTRAINT check_valid_barcode_type CHECK (
                barcode_type IN ('UPC', 'EAN-13', 'EAN-8', 'Code128', 'QRCode', 'ITF-14', 'Code39')
            ),
            CONSTRAINT check_barcode_length CHECK (
                (barcode_type = 'UPC' AND length(barcode) = 12) OR
                (barcode_type = 'EAN-13' AND length(barcode) = 13) OR
                (barcode_type = 'EAN-8' AND length(barcode) = 8) OR
                (barcode_type = 'ITF-14' AND length(barcode) = 14) OR
                (barcode_type IN ('Code128', 'QRCode', 'Code39') AND length(barcode) BETWEEN 1 AND 50)
            ),
            CONSTRAINT check_reorder_level CHECK (reorder_level <= stock_count),
            CONSTRAINT check_stock_count_non_negative CHECK (stock_count >= 0),
            CONSTRAINT check_reorder_level_non_negative CHECK (reorder_level >= 0)
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS product_discounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id INTEGER NOT NULL,
            discount_type TEXT NOT NULL CHECK (discount_type IN ('Percentage', 'Fixed Amount')),
            discount_value REAL NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            description TEXT NULL,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ','now')),
            updated_at TEXT NULL,
            FOREIGN KEY(product_id) REFERENCES products(id) ON DELETE CASCADE
        )"#,
    )
    .execute(pool)
    .await?;

    let indexes = [
        ("idx_products_category", "CREATE INDEX IF NOT EXISTS idx_products_category ON products(category_id)"),
        ("idx_products_quarter", "CREATE INDEX IF NOT EXISTS idx_products_quarter ON products(financial_quarter_id)"),
        ("idx_discounts_product", "CREATE INDEX IF NOT EXISTS idx_discounts_product ON product_discounts(product_id)"),
        ("idx_employees_group", "CREATE INDEX IF NOT EXISTS idx_employees_group ON employees(user_group_id)"),
    ];

    for (name, query) in indexes {
        if let Err(e) = sqlx::query(query).execute(pool).await {
            tracing::warn!("Failed to create index {}: {}", name, e);
        }
    }

    Ok(())
}
