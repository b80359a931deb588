//! Table DDL and seed data, applied at startup with `IF NOT EXISTS` so a
//! restart against an existing database is a no-op.

use crate::error::AppError;
use sqlx::PgPool;

const TABLE_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS farmer_details (
        id BIGSERIAL PRIMARY KEY,
        temp_id TEXT NOT NULL,
        coop_id TEXT NOT NULL,
        customer_id TEXT NOT NULL DEFAULT '',
        vendor_id TEXT NOT NULL DEFAULT '',
        farmer_id TEXT NOT NULL,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        mobile_number TEXT NOT NULL DEFAULT '',
        region_id TEXT NOT NULL DEFAULT '',
        region_part_id TEXT NOT NULL DEFAULT '',
        settlement_id BIGINT NOT NULL DEFAULT 0,
        settlement_part_id BIGINT NOT NULL DEFAULT 0,
        custom_geography_structure1_id BIGINT NOT NULL DEFAULT 0,
        custom_geography_structure2_id BIGINT NOT NULL DEFAULT 0,
        zip_code TEXT NOT NULL DEFAULT '',
        farmer_kyc_type_id BIGINT NOT NULL DEFAULT 0,
        farmer_kyc_type TEXT NOT NULL DEFAULT '',
        farmer_kyc_id TEXT NOT NULL DEFAULT '',
        club_id TEXT NOT NULL DEFAULT '',
        club_name TEXT NOT NULL DEFAULT '',
        club_leader_farmer_id TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        cust_id_update_at TIMESTAMPTZ,
        vendor_id_update_at TIMESTAMPTZ
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_farmer_details_coop_farmer ON farmer_details (coop_id, farmer_id)",
    r#"
    CREATE TABLE IF NOT EXISTS sales_orders (
        id BIGSERIAL PRIMARY KEY,
        temp_id TEXT NOT NULL,
        coop_id TEXT NOT NULL,
        order_id TEXT NOT NULL,
        order_number TEXT NOT NULL DEFAULT '',
        contract_id TEXT NOT NULL DEFAULT '',
        farmer_id TEXT NOT NULL DEFAULT '',
        farmer_name TEXT NOT NULL DEFAULT '',
        club_id TEXT NOT NULL DEFAULT '',
        club_name TEXT NOT NULL DEFAULT '',
        farmer_resource_category TEXT NOT NULL DEFAULT '',
        contract_crop TEXT NOT NULL DEFAULT '',
        contract_crop_variety TEXT NOT NULL DEFAULT '',
        contract_area DOUBLE PRECISION NOT NULL DEFAULT 0,
        sponsor_id BIGINT NOT NULL DEFAULT 0,
        sponsor_name TEXT NOT NULL DEFAULT '',
        buyer_id BIGINT NOT NULL DEFAULT 0,
        buyer_name TEXT NOT NULL DEFAULT '',
        package_set_caption_pt TEXT NOT NULL DEFAULT '',
        region_id BIGINT NOT NULL DEFAULT 0,
        region_part_id BIGINT NOT NULL DEFAULT 0,
        settlement_id BIGINT NOT NULL DEFAULT 0,
        settlement_part_id BIGINT NOT NULL DEFAULT 0,
        custom_zone1_id BIGINT NOT NULL DEFAULT 0,
        custom_zone2_id BIGINT NOT NULL DEFAULT 0,
        pickup_date TIMESTAMPTZ,
        created_by TEXT NOT NULL DEFAULT '',
        noof_order_items BIGINT NOT NULL DEFAULT 0,
        erp_sales_order_id TEXT NOT NULL DEFAULT '',
        erp_sales_order_code TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_sales_orders_coop_order ON sales_orders (coop_id, order_id)",
    r#"
    CREATE TABLE IF NOT EXISTS sales_order_items (
        id BIGSERIAL PRIMARY KEY,
        order_id TEXT NOT NULL,
        order_item_id TEXT NOT NULL DEFAULT '',
        order_item_number TEXT NOT NULL DEFAULT '',
        stock_keeping_unit TEXT NOT NULL DEFAULT '',
        erp_item_id TEXT NOT NULL DEFAULT '',
        erp_item_id2 TEXT NOT NULL DEFAULT '',
        product_group TEXT NOT NULL DEFAULT '',
        input_item_id TEXT NOT NULL DEFAULT '',
        input_item_name TEXT NOT NULL DEFAULT '',
        input_item_name_caption TEXT NOT NULL DEFAULT '',
        quantity DOUBLE PRECISION NOT NULL DEFAULT 0,
        quantity_unit_key TEXT NOT NULL DEFAULT '',
        unit_price DOUBLE PRECISION NOT NULL DEFAULT 0,
        price TEXT NOT NULL DEFAULT '',
        price_unit_key TEXT NOT NULL DEFAULT '',
        number_of_units BIGINT NOT NULL DEFAULT 0
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_sales_order_items_order ON sales_order_items (order_id)",
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id BIGSERIAL PRIMARY KEY,
        product_code TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS delivery_documents (
        id BIGSERIAL PRIMARY KEY,
        coop_id TEXT NOT NULL,
        erp_sales_order_code TEXT NOT NULL DEFAULT '',
        order_id TEXT NOT NULL,
        delivery_document_id TEXT NOT NULL,
        delivery_document_code TEXT NOT NULL DEFAULT '',
        order_item_id TEXT NOT NULL,
        stock_keeping_unit TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL DEFAULT 'NOT EXPIRED',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_delivery_documents_order ON delivery_documents (order_id)",
    "CREATE INDEX IF NOT EXISTS idx_delivery_documents_doc ON delivery_documents (delivery_document_id)",
    r#"
    CREATE TABLE IF NOT EXISTS waybills (
        id BIGSERIAL PRIMARY KEY,
        temp_id TEXT NOT NULL,
        coop_id TEXT NOT NULL,
        contract_id TEXT NOT NULL DEFAULT '',
        order_id TEXT NOT NULL DEFAULT '',
        region_id BIGINT NOT NULL DEFAULT 0,
        region_part_id BIGINT NOT NULL DEFAULT 0,
        settlement_id BIGINT NOT NULL DEFAULT 0,
        settlement_part_id BIGINT NOT NULL DEFAULT 0,
        custom_zone1_id BIGINT NOT NULL DEFAULT 0,
        custom_zone2_id BIGINT NOT NULL DEFAULT 0,
        sales_order_id TEXT NOT NULL DEFAULT '',
        sponsor_name TEXT NOT NULL DEFAULT '',
        customer_id TEXT NOT NULL DEFAULT '',
        delivery_note_id TEXT NOT NULL,
        delivery_note_document TEXT NOT NULL DEFAULT '',
        delivery_photos JSONB,
        erp_invoice_id TEXT NOT NULL DEFAULT '',
        erp_invoice_code TEXT NOT NULL DEFAULT '',
        erp_invoice_date TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_waybills_note ON waybills (delivery_note_id, coop_id)",
    r#"
    CREATE TABLE IF NOT EXISTS waybill_items (
        id BIGSERIAL PRIMARY KEY,
        coop_id TEXT NOT NULL DEFAULT '',
        order_id TEXT NOT NULL,
        name TEXT NOT NULL DEFAULT '',
        number_of_units BIGINT NOT NULL DEFAULT 0,
        quantity DOUBLE PRECISION NOT NULL DEFAULT 0,
        quantity_unit_key TEXT NOT NULL DEFAULT '',
        unit_price DOUBLE PRECISION NOT NULL DEFAULT 0,
        price DOUBLE PRECISION NOT NULL DEFAULT 0,
        price_unit_key TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL DEFAULT '',
        stock_keeping_unit TEXT NOT NULL DEFAULT '',
        erp_item_id TEXT NOT NULL DEFAULT '',
        erp_item_id2 TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_waybill_items_order ON waybill_items (order_id)",
    r#"
    CREATE TABLE IF NOT EXISTS code_sequences (
        field TEXT PRIMARY KEY,
        next_value BIGINT NOT NULL
    )
    "#,
];

/// Products known to the order validation. Seeded once on an empty table.
const SEED_PRODUCT_CODES: &[&str] = &[
    "IIT-101", "IIT-102", "IIT-103", "IIT-104", "IIT-105",
    "IIT-106", "IIT-107", "IIT-108", "IIT-109", "IIT-110",
];

pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    for ddl in TABLE_DDL {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

pub async fn seed_products(pool: &PgPool) -> Result<(), AppError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        tracing::debug!("products already seeded, skipping");
        return Ok(());
    }

    for code in SEED_PRODUCT_CODES {
        sqlx::query("INSERT INTO products (product_code) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(code)
            .execute(pool)
            .await?;
    }
    tracing::info!(count = SEED_PRODUCT_CODES.len(), "products seeded");
    Ok(())
}

/// Sanity check used by the readiness probe.
pub async fn ping(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query("SELECT 1").fetch_optional(pool).await?;
    Ok(())
}
