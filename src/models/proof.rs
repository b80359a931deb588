//! Waybill (delivery proof) rows and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Waybill {
    pub id: i64,
    pub temp_id: String,
    pub coop_id: String,
    pub contract_id: String,
    pub order_id: String,
    pub region_id: i64,
    pub region_part_id: i64,
    pub settlement_id: i64,
    pub settlement_part_id: i64,
    pub custom_zone1_id: i64,
    pub custom_zone2_id: i64,
    pub sales_order_id: String,
    pub sponsor_name: String,
    pub customer_id: String,
    pub delivery_note_id: String,
    pub delivery_note_document: String,
    pub delivery_photos: Option<serde_json::Value>,
    pub erp_invoice_id: String,
    pub erp_invoice_code: String,
    pub erp_invoice_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct WaybillItem {
    pub id: i64,
    pub coop_id: String,
    pub order_id: String,
    pub name: String,
    pub number_of_units: i64,
    pub quantity: f64,
    pub quantity_unit_key: String,
    pub unit_price: f64,
    pub price: f64,
    pub price_unit_key: String,
    pub status: String,
    pub stock_keeping_unit: String,
    pub erp_item_id: String,
    pub erp_item_id2: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProofPayload {
    pub waybill: WaybillPayload,
    #[serde(default)]
    pub waybill_items: Vec<WaybillItemPayload>,
}

#[derive(Debug, Deserialize)]
pub struct WaybillPayload {
    #[serde(default)]
    pub contract_id: String,
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub region_id: i64,
    #[serde(default)]
    pub region_part_id: i64,
    #[serde(default)]
    pub settlement_id: i64,
    #[serde(default)]
    pub settlement_part_id: i64,
    #[serde(default)]
    pub custom_zone1_id: i64,
    #[serde(default)]
    pub custom_zone2_id: i64,
    #[serde(default)]
    pub sales_order_id: String,
    #[serde(default)]
    pub sponsor_name: String,
    #[serde(rename = "customerId", default)]
    pub customer_id: String,
    #[serde(rename = "deliveryNoteId", default)]
    pub delivery_note_id: String,
    #[serde(rename = "deliveryNoteDocument", default)]
    pub delivery_note_document: String,
    #[serde(rename = "url1", default)]
    pub delivery_photo_url1: String,
    #[serde(rename = "url2", default)]
    pub delivery_photo_url2: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaybillItemPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number_of_units: i64,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub quantity_unit_key: String,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub price_unit_key: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub stock_keeping_unit: String,
}

#[derive(Debug, Serialize)]
pub struct CreateProofResponse {
    #[serde(rename = "sucess")]
    pub success: bool,
    pub data: CreateProofResponseData,
}

#[derive(Debug, Serialize)]
pub struct CreateProofResponseData {
    #[serde(rename = "tempERPProofId")]
    pub temp_erp_proof_id: String,
    #[serde(rename = "orderId")]
    pub order_id: String,
    #[serde(rename = "Message")]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ProofListEntry {
    #[serde(rename = "erpDeliveryDocumentId")]
    pub erp_delivery_document_id: String,
    #[serde(rename = "erpDeliveryDocumentCode")]
    pub erp_delivery_document_code: String,
}

#[derive(Debug, Serialize)]
pub struct InvoicesResponse {
    pub invoices: Vec<Invoice>,
}

#[derive(Debug, Serialize)]
pub struct Invoice {
    #[serde(rename = "erpInvoiceId")]
    pub erp_invoice_id: String,
    #[serde(rename = "erpInvoiceCode")]
    pub erp_invoice_code: String,
    #[serde(rename = "erpInvoiceDate")]
    pub erp_invoice_date: String,
    pub items: Vec<InvoiceItem>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceItem {
    #[serde(rename = "erpItemID")]
    pub erp_item_id: String,
    pub stock_keeping_unit: String,
    pub quantity: f64,
    #[serde(rename = "deliveryNote")]
    pub delivery_note: InvoiceDeliveryNote,
}

#[derive(Debug, Serialize)]
pub struct InvoiceDeliveryNote {
    #[serde(rename = "tempERPDeliveryNoteId")]
    pub temp_erp_delivery_note_id: String,
    #[serde(rename = "erpDeliveryDocumentId")]
    pub erp_delivery_document_id: String,
    #[serde(rename = "erpDeliveryDocumentCode")]
    pub erp_delivery_document_code: String,
    #[serde(rename = "erpDeliveryDocumentDate")]
    pub erp_delivery_document_date: DateTime<Utc>,
    #[serde(rename = "erpItemID")]
    pub erp_item_id: String,
    pub quantity: f64,
    pub order_item_id: String,
}
