//! Sales order intake and lookup. An order and its items are written in one
//! transaction; the ERP identifiers arrive later through the allocation
//! queue, so create responses always carry them empty.

use crate::codegen::CodeField;
use crate::error::AppError;
use crate::handlers::ListQuery;
use crate::models::format_ts;
use crate::models::sales::{
    CreateSalesOrderPayload, CreateSalesOrderResponse, CreateSalesOrderResponseData, SalesOrder,
    SalesOrderAmountResponse, SalesOrderListEntry,
};
use crate::models::EPOCH_PLACEHOLDER;
use crate::response::{failure_body, paginated};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

// Mock order amounts returned by the detail endpoint; the upstream contract
// only requires the three to be consistent.
const MOCK_ORDER_VALUE: f64 = 12500.50;
const MOCK_TAX_AMOUNT: f64 = 2250.09;
const MOCK_TOTAL_AMOUNT: f64 = 14750.59;

const INSERT_ORDER: &str = r#"
    INSERT INTO sales_orders (
        temp_id, coop_id, order_id, order_number, contract_id,
        farmer_id, farmer_name, club_id, club_name, farmer_resource_category,
        contract_crop, contract_crop_variety, contract_area, sponsor_id, sponsor_name,
        buyer_id, buyer_name, package_set_caption_pt, region_id, region_part_id,
        settlement_id, settlement_part_id, custom_zone1_id, custom_zone2_id,
        pickup_date, created_by, noof_order_items
    ) VALUES (
        $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
        $11, $12, $13, $14, $15, $16, $17, $18, $19, $20,
        $21, $22, $23, $24, $25, $26, $27
    )
    RETURNING *
"#;

const INSERT_ORDER_ITEM: &str = r#"
    INSERT INTO sales_order_items (
        order_id, order_item_id, order_item_number, stock_keeping_unit,
        erp_item_id, erp_item_id2, product_group, input_item_id,
        input_item_name, input_item_name_caption, quantity, quantity_unit_key,
        unit_price, price, price_unit_key, number_of_units
    ) VALUES (
        $1, $2, $3, $4, $5, $6, $7, $8,
        $9, $10, $11, $12, $13, $14, $15, $16
    )
"#;

pub async fn create_sales_order(
    State(state): State<AppState>,
    Path(coop_id): Path<String>,
    Json(payload): Json<CreateSalesOrderPayload>,
) -> Result<Response, AppError> {
    if !state.config.coop_allowed(&coop_id) {
        return Ok(reject("The indicated cooperative does not exist."));
    }
    if payload.order_id.is_empty() {
        return Ok(reject("You must specify the OrderID."));
    }

    let (dup_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM sales_orders WHERE order_id = $1 AND coop_id = $2")
            .bind(&payload.order_id)
            .bind(&coop_id)
            .fetch_one(&state.pool)
            .await?;
    if dup_count > 0 {
        return Ok(reject("The OrderId already exist."));
    }

    if payload.farmer_id.is_empty() {
        return Ok(reject("You must provide the FarmerID."));
    }
    if payload.contract_id.is_empty() {
        return Ok(reject("You must provide the ContractID."));
    }

    let (farmer_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM farmer_details WHERE farmer_id = $1 AND coop_id = $2")
            .bind(&payload.farmer_id)
            .bind(&coop_id)
            .fetch_one(&state.pool)
            .await?;
    if farmer_count == 0 {
        return Ok(reject("The indicated FarmerId does not exist."));
    }

    for item in &payload.order_items {
        if item.product_group.is_empty() {
            return Ok(reject("You must specify the item code or group."));
        }
        let (product_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM products WHERE product_code = $1")
                .bind(&item.product_group)
                .fetch_one(&state.pool)
                .await?;
        if product_count == 0 {
            return Ok(reject("The indicated itemcode/group does not exist ()."));
        }
        if item.quantity <= 0.0 {
            return Ok(reject("The quantity of the product must be greater than zero."));
        }
    }

    let mut tx = state.pool.begin().await?;

    let order: SalesOrder = sqlx::query_as(INSERT_ORDER)
        .bind(Uuid::new_v4().to_string())
        .bind(&coop_id)
        .bind(&payload.order_id)
        .bind(&payload.order_number)
        .bind(&payload.contract_id)
        .bind(&payload.farmer_id)
        .bind(&payload.farmer_name)
        .bind(&payload.club_id)
        .bind(&payload.club_name)
        .bind(&payload.farmer_resource_category)
        .bind(&payload.contract_crop)
        .bind(&payload.contract_crop_variety)
        .bind(payload.contract_area)
        .bind(payload.sponsor_id)
        .bind(&payload.sponsor_name)
        .bind(payload.buyer_id)
        .bind(&payload.buyer_name)
        .bind(&payload.package_set_caption_pt)
        .bind(payload.region_id)
        .bind(payload.region_part_id)
        .bind(payload.settlement_id)
        .bind(payload.settlement_part_id)
        .bind(payload.custom_zone1_id)
        .bind(payload.custom_zone2_id)
        .bind(payload.pickup_date)
        .bind(&payload.created_by)
        .bind(payload.order_items.len() as i64)
        .fetch_one(&mut *tx)
        .await?;

    for item in &payload.order_items {
        sqlx::query(INSERT_ORDER_ITEM)
            .bind(&order.order_id)
            .bind(&item.order_item_id)
            .bind(&item.order_item_number)
            .bind(&item.stock_keeping_unit)
            .bind(Uuid::new_v4().to_string())
            .bind(Uuid::new_v4().to_string())
            .bind(&item.product_group)
            .bind(&item.input_item_id)
            .bind(&item.input_item_name)
            .bind(&item.input_item_name_caption)
            .bind(item.quantity)
            .bind(&item.quantity_unit_key)
            .bind(item.unit_price)
            .bind(&item.price)
            .bind(&item.price_unit_key)
            .bind(item.number_of_units)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    state.allocator.enqueue(CodeField::ErpSalesOrderId, order.id);
    state.allocator.enqueue(CodeField::ErpSalesOrderCode, order.id);

    let response = CreateSalesOrderResponse {
        success: true,
        data: CreateSalesOrderResponseData {
            temp_erp_sales_order_id: order.temp_id.clone(),
            erp_sales_order_id: String::new(),
            erp_sales_order_code: String::new(),
            spic_sales_order_id: order.order_id.clone(),
            created_at: format_ts(&order.created_at),
            updated_at: format_ts(&order.updated_at),
            message: "Document saved with success.".into(),
        },
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

pub async fn list_sales_orders(
    State(state): State<AppState>,
    Path(coop_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    if !state.config.coop_allowed(&coop_id) {
        let body = json!({ "Message": "The indicated cooperative does not exist." });
        return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
    }

    let (from, to) = query.updated_range()?;
    let (page, limit) = query.page_and_limit();

    const FILTER: &str = "coop_id = $1 \
         AND ($2::timestamptz IS NULL OR updated_at >= $2) \
         AND ($3::timestamptz IS NULL OR updated_at <= $3)";

    let (total,): (i64,) = sqlx::query_as(&format!(
        "SELECT COUNT(*) FROM sales_orders WHERE {}",
        FILTER
    ))
    .bind(&coop_id)
    .bind(from)
    .bind(to)
    .fetch_one(&state.pool)
    .await?;

    let rows: Vec<SalesOrder> = sqlx::query_as(&format!(
        "SELECT * FROM sales_orders WHERE {} ORDER BY id LIMIT $4 OFFSET $5",
        FILTER
    ))
    .bind(&coop_id)
    .bind(from)
    .bind(to)
    .bind(limit)
    .bind(query.offset())
    .fetch_all(&state.pool)
    .await?;

    let data: Vec<SalesOrderListEntry> = rows.iter().map(SalesOrderListEntry::from_row).collect();
    Ok(Json(paginated(data, page, limit, total)).into_response())
}

/// Order amounts are mocked: every known order answers the same fixed trio.
pub async fn get_sales_order(
    State(state): State<AppState>,
    Path((coop_id, order_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    if !state.config.coop_allowed(&coop_id) {
        return Ok(reject_amount(
            "The indicated cooperative does not exist.",
            &order_id,
        ));
    }

    let order: Option<SalesOrder> =
        sqlx::query_as("SELECT * FROM sales_orders WHERE coop_id = $1 AND order_id = $2")
            .bind(&coop_id)
            .bind(&order_id)
            .fetch_optional(&state.pool)
            .await?;
    let Some(order) = order else {
        return Ok(reject_amount(
            "There is no order with the indicated OrderID.",
            &order_id,
        ));
    };

    let now = format_ts(&Utc::now());
    let response = SalesOrderAmountResponse {
        message: String::new(),
        temp_erp_sales_order_id: order.temp_id.clone(),
        erp_sales_order_id: order.erp_sales_order_id.clone(),
        erp_sales_order_code: order.erp_sales_order_code.clone(),
        spic_sales_order_id: order.order_id.clone(),
        created_at: now.clone(),
        updated_at: now,
        order_value: MOCK_ORDER_VALUE,
        tax_amount: MOCK_TAX_AMOUNT,
        total_amount: MOCK_TOTAL_AMOUNT,
    };
    Ok(Json(response).into_response())
}

fn reject(message: &str) -> Response {
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
    let body = failure_body(json!({
        "tempERPSalesOrderId": "0",
        "erpSalesOrderId": "",
        "erpSalesOrderCode": "",
        "spicSalesOrderId": "",
        "createdAt": now,
        "updatedAt": now,
        "message": message,
    }));
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

fn reject_amount(message: &str, order_id: &str) -> Response {
    let response = SalesOrderAmountResponse {
        message: message.to_string(),
        temp_erp_sales_order_id: String::new(),
        erp_sales_order_id: String::new(),
        erp_sales_order_code: String::new(),
        spic_sales_order_id: order_id.to_string(),
        created_at: EPOCH_PLACEHOLDER.into(),
        updated_at: EPOCH_PLACEHOLDER.into(),
        order_value: 0.0,
        tax_amount: 0.0,
        total_amount: 0.0,
    };
    (StatusCode::BAD_REQUEST, Json(response)).into_response()
}
