//! Database schema definitions
//!
//! This module contains the SQL schema for the product table.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per natural key (category, product_name, product_link, product_price)
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category TEXT,
    product_name TEXT,
    product_link TEXT,
    product_price REAL
);

-- Uniqueness is enforced by lookup-before-insert, the index only speeds the lookup
CREATE INDEX IF NOT EXISTS idx_products_natural_key
    ON products(category, product_name, product_link, product_price);

CREATE INDEX IF NOT EXISTS idx_products_category ON products(category);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
