//! Delivery document creation and the delivery-note views.
//!
//! A "delivery document" is a group of order items shipped together: creating
//! N documents for an order splits its items into N contiguous chunks, each
//! chunk sharing one allocated document code and one generated document id.

use crate::codegen::CodeField;
use crate::error::AppError;
use crate::handlers::ListQuery;
use crate::models::delivery::{
    CreateDeliveryDocumentsPayload, DeliveryDocument, DeliveryDocumentsListEntry, DeliveryNote,
    DeliveryNoteItem, DeliveryNoteSalesOrder, DeliveryNotesResponse, OrderWithDocuments,
};
use crate::models::sales::{SalesOrder, SalesOrderItem};
use crate::response::paginated;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rand::Rng;
use serde_json::json;
use uuid::Uuid;

pub async fn create_delivery_documents(
    State(state): State<AppState>,
    Path(coop_id): Path<String>,
    Json(payload): Json<CreateDeliveryDocumentsPayload>,
) -> Result<Response, AppError> {
    let order: Option<SalesOrder> = sqlx::query_as(
        "SELECT * FROM sales_orders WHERE order_id = $1 AND erp_sales_order_code = $2",
    )
    .bind(&payload.order_id)
    .bind(&payload.erp_sales_order_code)
    .fetch_optional(&state.pool)
    .await?;
    let Some(order) = order else {
        return Ok(message_response(
            StatusCode::BAD_REQUEST,
            "OrderId or SalesOrder not found ",
        ));
    };

    let (existing_docs,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM delivery_documents WHERE order_id = $1")
            .bind(&payload.order_id)
            .fetch_one(&state.pool)
            .await?;
    if existing_docs > 0 {
        return Ok(message_response(
            StatusCode::BAD_REQUEST,
            "Delivery Documents already Created for the OrderId",
        ));
    }

    let n = payload.no_of_delivery_documents;
    if n == 0 {
        return Ok(message_response(
            StatusCode::BAD_REQUEST,
            "NoofDeliveryDocuments must be greater than 0",
        ));
    }
    if n as i64 > order.noof_order_items {
        return Ok(message_response(
            StatusCode::BAD_REQUEST,
            "Number of delivery documents cannot be greater than number of order items",
        ));
    }

    let items: Vec<SalesOrderItem> =
        sqlx::query_as("SELECT * FROM sales_order_items WHERE order_id = $1 ORDER BY id")
            .bind(&payload.order_id)
            .fetch_all(&state.pool)
            .await?;

    let chunks = split_into_chunks(items, n);

    for chunk in &chunks {
        let code = state.codes.next_code(CodeField::DeliveryDocumentCode).await?;
        let document_id = Uuid::new_v4().to_string();

        for item in chunk {
            sqlx::query(
                "INSERT INTO delivery_documents \
                 (coop_id, erp_sales_order_code, order_id, delivery_document_id, \
                  delivery_document_code, order_item_id, stock_keeping_unit) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(&coop_id)
            .bind(&payload.erp_sales_order_code)
            .bind(&payload.order_id)
            .bind(&document_id)
            .bind(&code)
            .bind(&item.order_item_id)
            .bind(random_nine_digit_sku())
            .execute(&state.pool)
            .await?;
        }
    }

    Ok((StatusCode::CREATED, Json(json!({ "deliveryDocuments": chunks }))).into_response())
}

pub async fn list_delivery_documents(
    State(state): State<AppState>,
    Path(coop_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    if !state.config.coop_allowed(&coop_id) {
        return Ok(message_response(
            StatusCode::BAD_REQUEST,
            "The indicated cooperative does not exist.",
        ));
    }

    let (from, to) = query.updated_range()?;
    let (page, limit) = query.page_and_limit();

    const FILTER: &str = "sales_orders.coop_id = $1 \
         AND ($2::timestamptz IS NULL OR delivery_documents.updated_at >= $2) \
         AND ($3::timestamptz IS NULL OR delivery_documents.updated_at <= $3)";

    let (total,): (i64,) = sqlx::query_as(&format!(
        "SELECT COUNT(DISTINCT sales_orders.order_id) FROM sales_orders \
         JOIN delivery_documents ON delivery_documents.order_id = sales_orders.order_id \
         WHERE {}",
        FILTER
    ))
    .bind(&coop_id)
    .bind(from)
    .bind(to)
    .fetch_one(&state.pool)
    .await?;

    let rows: Vec<OrderWithDocuments> = sqlx::query_as(&format!(
        "SELECT sales_orders.temp_id, sales_orders.erp_sales_order_id, \
                sales_orders.erp_sales_order_code, sales_orders.order_id \
         FROM sales_orders \
         JOIN delivery_documents ON delivery_documents.order_id = sales_orders.order_id \
         WHERE {} \
         GROUP BY sales_orders.temp_id, sales_orders.erp_sales_order_id, \
                  sales_orders.erp_sales_order_code, sales_orders.order_id \
         ORDER BY sales_orders.order_id LIMIT $4 OFFSET $5",
        FILTER
    ))
    .bind(&coop_id)
    .bind(from)
    .bind(to)
    .bind(limit)
    .bind(query.offset())
    .fetch_all(&state.pool)
    .await?;

    let data: Vec<DeliveryDocumentsListEntry> = rows
        .iter()
        .map(DeliveryDocumentsListEntry::from_row)
        .collect();
    Ok(Json(paginated(data, page, limit, total)).into_response())
}

pub async fn get_delivery_notes(
    State(state): State<AppState>,
    Path((coop_id, order_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    if !state.config.coop_allowed(&coop_id) {
        return Ok(message_response(
            StatusCode::BAD_REQUEST,
            "The indicated cooperative does not exist.",
        ));
    }

    let order: Option<SalesOrder> =
        sqlx::query_as("SELECT * FROM sales_orders WHERE order_id = $1 AND coop_id = $2")
            .bind(&order_id)
            .bind(&coop_id)
            .fetch_optional(&state.pool)
            .await?;
    let Some(order) = order else {
        let body = json!({ "deliverynotes": [] });
        return Ok((StatusCode::NOT_FOUND, Json(body)).into_response());
    };

    let order_items: Vec<SalesOrderItem> =
        sqlx::query_as("SELECT * FROM sales_order_items WHERE order_id = $1 ORDER BY id")
            .bind(&order_id)
            .fetch_all(&state.pool)
            .await?;

    let docs: Vec<DeliveryDocument> = sqlx::query_as(
        "SELECT * FROM delivery_documents WHERE order_id = $1 AND coop_id = $2 ORDER BY id",
    )
    .bind(&order_id)
    .bind(&coop_id)
    .fetch_all(&state.pool)
    .await?;

    let mut notes = Vec::new();
    for (code, group) in group_by_code(docs) {
        let mut note = DeliveryNote {
            erp_delivery_document_id: group[0].delivery_document_id.clone(),
            erp_delivery_document_code: code,
            erp_delivery_document_date: group[0].created_at,
            items: Vec::new(),
        };
        for doc in &group {
            for item in order_items.iter().filter(|i| i.order_item_id == doc.order_item_id) {
                note.items.push(DeliveryNoteItem {
                    erp_item_id: item.erp_item_id2.clone(),
                    stock_keeping_unit: item.stock_keeping_unit.clone(),
                    quantity: item.quantity,
                    sales_order: DeliveryNoteSalesOrder {
                        temp_erp_sales_order_id: order.temp_id.clone(),
                        erp_sales_order_id: order.erp_sales_order_id.clone(),
                        erp_sales_order_code: order.erp_sales_order_code.clone(),
                        spic_sales_order_id: order.order_id.clone(),
                        erp_item_id: item.erp_item_id.clone(),
                        order_item_id: item.order_item_id.clone(),
                    },
                });
            }
        }
        notes.push(note);
    }

    Ok(Json(DeliveryNotesResponse { delivery_notes: notes }).into_response())
}

/// Split `items` into `n` contiguous chunks; when the count does not divide
/// evenly, the first chunks take one extra item each. Empty chunks are
/// possible only when `n` exceeds the item count.
pub fn split_into_chunks<T>(items: Vec<T>, n: usize) -> Vec<Vec<T>> {
    if n == 0 {
        return Vec::new();
    }
    let total = items.len();
    let base = total / n;
    let mut remainder = total % n;

    let mut chunks = Vec::with_capacity(n);
    let mut iter = items.into_iter();
    for _ in 0..n {
        let mut size = base;
        if remainder > 0 {
            size += 1;
            remainder -= 1;
        }
        chunks.push(iter.by_ref().take(size).collect());
    }
    chunks
}

/// Group document rows by code, preserving first-seen order.
pub fn group_by_code(docs: Vec<DeliveryDocument>) -> Vec<(String, Vec<DeliveryDocument>)> {
    let mut groups: Vec<(String, Vec<DeliveryDocument>)> = Vec::new();
    for doc in docs {
        match groups.iter_mut().find(|(code, _)| *code == doc.delivery_document_code) {
            Some((_, group)) => group.push(doc),
            None => groups.push((doc.delivery_document_code.clone(), vec![doc])),
        }
    }
    groups
}

fn random_nine_digit_sku() -> String {
    let n: u32 = rand::thread_rng().gen_range(100_000_000..1_000_000_000);
    n.to_string()
}

fn message_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "Message": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn even_split_gives_equal_chunks() {
        let chunks = split_into_chunks((0..6).collect(), 3);
        assert_eq!(chunks, vec![vec![0, 1], vec![2, 3], vec![4, 5]]);
    }

    #[test]
    fn remainder_spreads_over_leading_chunks() {
        let chunks = split_into_chunks((0..7).collect(), 3);
        assert_eq!(chunks, vec![vec![0, 1, 2], vec![3, 4], vec![5, 6]]);
    }

    #[test]
    fn more_chunks_than_items_leaves_trailing_empties() {
        let chunks = split_into_chunks(vec![1, 2], 4);
        assert_eq!(chunks, vec![vec![1], vec![2], vec![], vec![]]);
    }

    #[test]
    fn zero_chunks_yields_nothing() {
        let chunks: Vec<Vec<i32>> = split_into_chunks(vec![1, 2, 3], 0);
        assert!(chunks.is_empty());
    }

    #[test]
    fn sku_is_nine_digits() {
        for _ in 0..100 {
            let sku = random_nine_digit_sku();
            assert_eq!(sku.len(), 9);
            assert!(sku.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(sku.as_bytes()[0], b'0');
        }
    }

    fn doc(code: &str, item: &str) -> DeliveryDocument {
        let now = Utc::now();
        DeliveryDocument {
            id: 0,
            coop_id: "coop1".into(),
            erp_sales_order_code: "ECL 2025/1".into(),
            order_id: "SO-1".into(),
            delivery_document_id: "doc".into(),
            delivery_document_code: code.into(),
            order_item_id: item.into(),
            stock_keeping_unit: "123456789".into(),
            status: "NOT EXPIRED".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn grouping_preserves_first_seen_order() {
        let docs = vec![
            doc("GT2 2025/2", "a"),
            doc("GT2 2025/1", "b"),
            doc("GT2 2025/2", "c"),
        ];
        let groups = group_by_code(docs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "GT2 2025/2");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "GT2 2025/1");
    }
}
