//! Delivery proof (waybill) intake and the invoice views built from it.
//!
//! A proof submission references one delivery document by its document id
//! (the "delivery note"). Items are merged by stock keeping unit and each
//! merged SKU must exist on the referenced document before anything is
//! written. Invoice fields are minted with the waybill and, for waybills
//! predating that, lazily on first invoice read.

use crate::codegen::CodeField;
use crate::error::AppError;
use crate::handlers::ListQuery;
use crate::models::delivery::DeliveryDocument;
use crate::models::proof::{
    CreateProofPayload, CreateProofResponse, CreateProofResponseData, Invoice,
    InvoiceDeliveryNote, InvoiceItem, InvoicesResponse, ProofListEntry, Waybill, WaybillItem,
    WaybillItemPayload,
};
use crate::response::{failure_body, paginated};
use crate::state::AppState;
use crate::sweeper::STATUS_NOT_EXPIRED;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

const INSERT_WAYBILL: &str = r#"
    INSERT INTO waybills (
        temp_id, coop_id, contract_id, order_id, region_id, region_part_id,
        settlement_id, settlement_part_id, custom_zone1_id, custom_zone2_id,
        sales_order_id, sponsor_name, customer_id, delivery_note_id,
        delivery_note_document, delivery_photos,
        erp_invoice_id, erp_invoice_code, erp_invoice_date
    ) VALUES (
        $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
        $11, $12, $13, $14, $15, $16, $17, $18, NOW()
    )
    RETURNING *
"#;

const INSERT_WAYBILL_ITEM: &str = r#"
    INSERT INTO waybill_items (
        coop_id, order_id, name, number_of_units, quantity, quantity_unit_key,
        unit_price, price, price_unit_key, status, stock_keeping_unit,
        erp_item_id, erp_item_id2
    ) VALUES (
        $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13
    )
"#;

pub async fn create_proof(
    State(state): State<AppState>,
    Path((coop_id, delivery_note_id)): Path<(String, String)>,
    Json(payload): Json<CreateProofPayload>,
) -> Result<Response, AppError> {
    if !state.config.coop_allowed(&coop_id) {
        return Ok(reject("The indicated cooperative does not exist."));
    }
    if payload.waybill.delivery_note_id.is_empty() {
        return Ok(reject("Please indicate the ID of the delivery guide."));
    }
    if payload.waybill.delivery_note_id != delivery_note_id {
        return Ok(reject(
            "The guide ID, URL and information sent are not the same.",
        ));
    }

    // The referenced document must still be pending; expired documents no
    // longer accept proofs.
    let (live_docs,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM delivery_documents \
         WHERE delivery_document_id = $1 AND coop_id = $2 AND status = $3",
    )
    .bind(&delivery_note_id)
    .bind(&coop_id)
    .bind(STATUS_NOT_EXPIRED)
    .fetch_one(&state.pool)
    .await?;
    if live_docs == 0 {
        return Ok(reject(
            "The delivery guide has been canceled or is no longer pending.",
        ));
    }

    let merged = merge_items_by_sku(payload.waybill_items);

    // Validate every merged SKU before any insert.
    for item in &merged {
        let (matches,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM delivery_documents \
             WHERE delivery_document_id = $1 AND stock_keeping_unit = $2",
        )
        .bind(&delivery_note_id)
        .bind(&item.stock_keeping_unit)
        .fetch_one(&state.pool)
        .await?;
        if matches == 0 {
            return Ok(reject(&format!(
                "The indicated item does not exist ({}).",
                item.stock_keeping_unit
            )));
        }
    }

    let invoice_code = state.codes.next_code(CodeField::ErpInvoiceCode).await?;
    let photos = json!([{
        "url1": payload.waybill.delivery_photo_url1,
        "url2": payload.waybill.delivery_photo_url2,
    }]);

    let mut tx = state.pool.begin().await?;

    let waybill: Waybill = sqlx::query_as(INSERT_WAYBILL)
        .bind(Uuid::new_v4().to_string())
        .bind(&coop_id)
        .bind(&payload.waybill.contract_id)
        .bind(&payload.waybill.order_id)
        .bind(payload.waybill.region_id)
        .bind(payload.waybill.region_part_id)
        .bind(payload.waybill.settlement_id)
        .bind(payload.waybill.settlement_part_id)
        .bind(payload.waybill.custom_zone1_id)
        .bind(payload.waybill.custom_zone2_id)
        .bind(&payload.waybill.sales_order_id)
        .bind(&payload.waybill.sponsor_name)
        .bind(&payload.waybill.customer_id)
        .bind(&payload.waybill.delivery_note_id)
        .bind(&payload.waybill.delivery_note_document)
        .bind(photos)
        .bind(Uuid::new_v4().to_string())
        .bind(&invoice_code)
        .fetch_one(&mut *tx)
        .await?;

    for item in &merged {
        sqlx::query(INSERT_WAYBILL_ITEM)
            .bind(&coop_id)
            .bind(&waybill.order_id)
            .bind(&item.name)
            .bind(item.number_of_units)
            .bind(item.quantity)
            .bind(&item.quantity_unit_key)
            .bind(item.unit_price)
            .bind(item.price)
            .bind(&item.price_unit_key)
            .bind(&item.status)
            .bind(&item.stock_keeping_unit)
            .bind(Uuid::new_v4().to_string())
            .bind(Uuid::new_v4().to_string())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    let response = CreateProofResponse {
        success: true,
        data: CreateProofResponseData {
            temp_erp_proof_id: waybill.temp_id.clone(),
            order_id: waybill.order_id.clone(),
            message: "Delivery proof created successfully".into(),
        },
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Row projection for the invoices list: one entry per delivery document
/// that has a proof on file.
#[derive(FromRow)]
struct ProvenDocument {
    delivery_document_id: String,
    delivery_document_code: String,
}

pub async fn list_proven_documents(
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

    const FILTER: &str = "waybills.coop_id = $1 \
         AND ($2::timestamptz IS NULL OR waybills.updated_at >= $2) \
         AND ($3::timestamptz IS NULL OR waybills.updated_at <= $3)";

    let (total,): (i64,) = sqlx::query_as(&format!(
        "SELECT COUNT(DISTINCT delivery_documents.delivery_document_id) FROM waybills \
         JOIN delivery_documents \
           ON delivery_documents.delivery_document_id = waybills.delivery_note_id \
         WHERE {}",
        FILTER
    ))
    .bind(&coop_id)
    .bind(from)
    .bind(to)
    .fetch_one(&state.pool)
    .await?;

    let rows: Vec<ProvenDocument> = sqlx::query_as(&format!(
        "SELECT DISTINCT delivery_documents.delivery_document_id, \
                delivery_documents.delivery_document_code \
         FROM waybills \
         JOIN delivery_documents \
           ON delivery_documents.delivery_document_id = waybills.delivery_note_id \
         WHERE {} \
         ORDER BY delivery_documents.delivery_document_code LIMIT $4 OFFSET $5",
        FILTER
    ))
    .bind(&coop_id)
    .bind(from)
    .bind(to)
    .bind(limit)
    .bind(query.offset())
    .fetch_all(&state.pool)
    .await?;

    let data: Vec<ProofListEntry> = rows
        .into_iter()
        .map(|row| ProofListEntry {
            erp_delivery_document_id: row.delivery_document_id,
            erp_delivery_document_code: row.delivery_document_code,
        })
        .collect();
    Ok(Json(paginated(data, page, limit, total)).into_response())
}

pub async fn get_invoices(
    State(state): State<AppState>,
    Path((coop_id, delivery_note_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    if !state.config.coop_allowed(&coop_id) {
        let body = json!({ "success": false, "message": "Invalid cooperative ID" });
        return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
    }

    let waybill: Option<Waybill> =
        sqlx::query_as("SELECT * FROM waybills WHERE delivery_note_id = $1 AND coop_id = $2")
            .bind(&delivery_note_id)
            .bind(&coop_id)
            .fetch_optional(&state.pool)
            .await?;
    let Some(mut waybill) = waybill else {
        return Ok(Json(json!({ "invoices": [] })).into_response());
    };

    // Older waybills may predate invoice minting at submission; assign the
    // fields write-once on first read.
    if waybill.erp_invoice_id.is_empty() {
        state.codes.allocate(CodeField::ErpInvoiceCode, waybill.id).await?;
        sqlx::query(
            "UPDATE waybills SET erp_invoice_id = $1, erp_invoice_date = NOW() \
             WHERE id = $2 AND erp_invoice_id = ''",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(waybill.id)
        .execute(&state.pool)
        .await?;

        waybill = sqlx::query_as("SELECT * FROM waybills WHERE id = $1")
            .bind(waybill.id)
            .fetch_one(&state.pool)
            .await?;
    }

    let doc: Option<DeliveryDocument> =
        sqlx::query_as("SELECT * FROM delivery_documents WHERE delivery_document_id = $1 LIMIT 1")
            .bind(&waybill.delivery_note_id)
            .fetch_optional(&state.pool)
            .await?;
    let Some(doc) = doc else {
        return Err(AppError::NotFound(format!(
            "delivery document {}",
            waybill.delivery_note_id
        )));
    };

    let items: Vec<WaybillItem> =
        sqlx::query_as("SELECT * FROM waybill_items WHERE order_id = $1 ORDER BY id")
            .bind(&waybill.order_id)
            .fetch_all(&state.pool)
            .await?;

    let invoice_items: Vec<InvoiceItem> = items
        .iter()
        .map(|item| InvoiceItem {
            erp_item_id: item.erp_item_id.clone(),
            stock_keeping_unit: item.stock_keeping_unit.clone(),
            quantity: item.quantity,
            delivery_note: InvoiceDeliveryNote {
                temp_erp_delivery_note_id: waybill.temp_id.clone(),
                erp_delivery_document_id: doc.delivery_document_id.clone(),
                erp_delivery_document_code: doc.delivery_document_code.clone(),
                erp_delivery_document_date: doc.created_at,
                erp_item_id: item.erp_item_id.clone(),
                quantity: item.quantity,
                order_item_id: doc.order_item_id.clone(),
            },
        })
        .collect();

    let invoice_date = waybill
        .erp_invoice_date
        .map(|t| t.to_rfc3339())
        .unwrap_or_default();
    let response = InvoicesResponse {
        invoices: vec![Invoice {
            erp_invoice_id: waybill.erp_invoice_id.clone(),
            erp_invoice_code: waybill.erp_invoice_code.clone(),
            erp_invoice_date: invoice_date,
            items: invoice_items,
        }],
    };
    Ok(Json(response).into_response())
}

/// Merge duplicate SKUs, summing unit counts and quantities; the first
/// occurrence supplies every other field and the original order is kept.
pub fn merge_items_by_sku(items: Vec<WaybillItemPayload>) -> Vec<WaybillItemPayload> {
    let mut merged: Vec<WaybillItemPayload> = Vec::new();
    for item in items {
        match merged
            .iter_mut()
            .find(|m| m.stock_keeping_unit == item.stock_keeping_unit)
        {
            Some(existing) => {
                existing.number_of_units += item.number_of_units;
                existing.quantity += item.quantity;
            }
            None => merged.push(item),
        }
    }
    merged
}

fn reject(message: &str) -> Response {
    let body = failure_body(json!({
        "tempERPProofId": "",
        "orderId": "",
        "Message": message,
    }));
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(sku: &str, units: i64, quantity: f64) -> WaybillItemPayload {
        WaybillItemPayload {
            name: format!("item {}", sku),
            number_of_units: units,
            quantity,
            quantity_unit_key: "KG".into(),
            unit_price: 2.5,
            price: quantity * 2.5,
            price_unit_key: "EUR".into(),
            status: "DELIVERED".into(),
            stock_keeping_unit: sku.into(),
        }
    }

    #[test]
    fn duplicate_skus_sum_units_and_quantity() {
        let merged = merge_items_by_sku(vec![
            item("111222333", 2, 10.0),
            item("444555666", 1, 5.0),
            item("111222333", 3, 7.5),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].stock_keeping_unit, "111222333");
        assert_eq!(merged[0].number_of_units, 5);
        assert_eq!(merged[0].quantity, 17.5);
        assert_eq!(merged[1].stock_keeping_unit, "444555666");
    }

    #[test]
    fn first_occurrence_wins_for_other_fields() {
        let mut second = item("111222333", 1, 1.0);
        second.name = "other name".into();
        let merged = merge_items_by_sku(vec![item("111222333", 1, 1.0), second]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "item 111222333");
    }

    #[test]
    fn empty_submission_stays_empty() {
        assert!(merge_items_by_sku(Vec::new()).is_empty());
    }
}
