//! Delivery document rows and DTOs. One row per order item; rows sharing a
//! `delivery_document_id`/`delivery_document_code` pair form one document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct DeliveryDocument {
    pub id: i64,
    pub coop_id: String,
    pub erp_sales_order_code: String,
    pub order_id: String,
    pub delivery_document_id: String,
    pub delivery_document_code: String,
    pub order_item_id: String,
    pub stock_keeping_unit: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDeliveryDocumentsPayload {
    #[serde(default)]
    pub erp_sales_order_code: String,
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub no_of_delivery_documents: usize,
}

/// Join projection for the documents list: sales-order identifiers for
/// orders that have at least one delivery document.
#[derive(Debug, FromRow)]
pub struct OrderWithDocuments {
    pub temp_id: String,
    pub erp_sales_order_id: String,
    pub erp_sales_order_code: String,
    pub order_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeliveryDocumentsListEntry {
    #[serde(rename = "tempERPSalesOrderId")]
    pub temp_erp_sales_order_id: String,
    #[serde(rename = "erpSalesOrderId")]
    pub erp_sales_order_id: String,
    #[serde(rename = "erpSalesOrderCode")]
    pub erp_sales_order_code: String,
    #[serde(rename = "spicSalesOrderId")]
    pub spic_sales_order_id: String,
}

impl DeliveryDocumentsListEntry {
    pub fn from_row(row: &OrderWithDocuments) -> Self {
        DeliveryDocumentsListEntry {
            temp_erp_sales_order_id: row.temp_id.clone(),
            erp_sales_order_id: row.erp_sales_order_id.clone(),
            erp_sales_order_code: row.erp_sales_order_code.clone(),
            spic_sales_order_id: row.order_id.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeliveryNotesResponse {
    #[serde(rename = "deliveryNotes")]
    pub delivery_notes: Vec<DeliveryNote>,
}

#[derive(Debug, Serialize)]
pub struct DeliveryNote {
    #[serde(rename = "erpDeliveryDocumentId")]
    pub erp_delivery_document_id: String,
    #[serde(rename = "erpDeliveryDocumentCode")]
    pub erp_delivery_document_code: String,
    #[serde(rename = "erpDeliveryDocumentDate")]
    pub erp_delivery_document_date: DateTime<Utc>,
    pub items: Vec<DeliveryNoteItem>,
}

#[derive(Debug, Serialize)]
pub struct DeliveryNoteItem {
    #[serde(rename = "erpItemID")]
    pub erp_item_id: String,
    pub stock_keeping_unit: String,
    pub quantity: f64,
    #[serde(rename = "salesOrder")]
    pub sales_order: DeliveryNoteSalesOrder,
}

#[derive(Debug, Serialize)]
pub struct DeliveryNoteSalesOrder {
    #[serde(rename = "tempERPSalesOrderId")]
    pub temp_erp_sales_order_id: String,
    #[serde(rename = "erpSalesOrderId")]
    pub erp_sales_order_id: String,
    #[serde(rename = "erpSalesOrderCode")]
    pub erp_sales_order_code: String,
    #[serde(rename = "spicSalesOrderId")]
    pub spic_sales_order_id: String,
    #[serde(rename = "erpItemID")]
    pub erp_item_id: String,
    pub order_item_id: String,
}
