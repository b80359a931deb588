//! Sales order rows and DTOs.

use super::format_ts;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct SalesOrder {
    pub id: i64,
    pub temp_id: String,
    pub coop_id: String,
    pub order_id: String,
    pub order_number: String,
    pub contract_id: String,
    pub farmer_id: String,
    pub farmer_name: String,
    pub club_id: String,
    pub club_name: String,
    pub farmer_resource_category: String,
    pub contract_crop: String,
    pub contract_crop_variety: String,
    pub contract_area: f64,
    pub sponsor_id: i64,
    pub sponsor_name: String,
    pub buyer_id: i64,
    pub buyer_name: String,
    pub package_set_caption_pt: String,
    pub region_id: i64,
    pub region_part_id: i64,
    pub settlement_id: i64,
    pub settlement_part_id: i64,
    pub custom_zone1_id: i64,
    pub custom_zone2_id: i64,
    pub pickup_date: Option<DateTime<Utc>>,
    pub created_by: String,
    pub noof_order_items: i64,
    pub erp_sales_order_id: String,
    pub erp_sales_order_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SalesOrderItem {
    pub id: i64,
    pub order_id: String,
    pub order_item_id: String,
    pub order_item_number: String,
    pub stock_keeping_unit: String,
    pub erp_item_id: String,
    pub erp_item_id2: String,
    pub product_group: String,
    pub input_item_id: String,
    pub input_item_name: String,
    pub input_item_name_caption: String,
    pub quantity: f64,
    pub quantity_unit_key: String,
    pub unit_price: f64,
    pub price: String,
    pub price_unit_key: String,
    pub number_of_units: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateSalesOrderPayload {
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub order_number: String,
    #[serde(default)]
    pub contract_id: String,
    #[serde(default)]
    pub farmer_id: String,
    #[serde(default)]
    pub farmer_name: String,
    #[serde(default)]
    pub club_id: String,
    #[serde(default)]
    pub club_name: String,
    #[serde(default)]
    pub farmer_resource_category: String,
    #[serde(default)]
    pub contract_crop: String,
    #[serde(rename = "contract_cropVareity", default)]
    pub contract_crop_variety: String,
    #[serde(rename = "contractArea", default)]
    pub contract_area: f64,
    #[serde(default)]
    pub sponsor_id: i64,
    #[serde(rename = "sponser_name", default)]
    pub sponsor_name: String,
    #[serde(default)]
    pub buyer_id: i64,
    #[serde(default)]
    pub buyer_name: String,
    #[serde(default)]
    pub package_set_caption_pt: String,
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
    pub pickup_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub order_items: Vec<OrderItemPayload>,
}

#[derive(Debug, Deserialize)]
pub struct OrderItemPayload {
    #[serde(default)]
    pub order_item_id: String,
    #[serde(default)]
    pub order_item_number: String,
    #[serde(default)]
    pub stock_keeping_unit: String,
    #[serde(default)]
    pub product_group: String,
    #[serde(default)]
    pub input_item_id: String,
    #[serde(default)]
    pub input_item_name: String,
    #[serde(default)]
    pub input_item_name_caption: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub quantity_unit_key: String,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub price_unit_key: String,
    #[serde(default)]
    pub number_of_units: i64,
}

#[derive(Debug, Serialize)]
pub struct CreateSalesOrderResponse {
    pub success: bool,
    pub data: CreateSalesOrderResponseData,
}

#[derive(Debug, Serialize)]
pub struct CreateSalesOrderResponseData {
    #[serde(rename = "tempERPSalesOrderId")]
    pub temp_erp_sales_order_id: String,
    #[serde(rename = "erpSalesOrderId")]
    pub erp_sales_order_id: String,
    #[serde(rename = "erpSalesOrderCode")]
    pub erp_sales_order_code: String,
    #[serde(rename = "spicSalesOrderId")]
    pub spic_sales_order_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    #[serde(rename = "Message")]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SalesOrderListEntry {
    #[serde(rename = "tempERPSalesOrderId")]
    pub temp_erp_sales_order_id: String,
    #[serde(rename = "erpSalesOrderId")]
    pub erp_sales_order_id: String,
    #[serde(rename = "erpSalesOrderCode")]
    pub erp_sales_order_code: String,
    #[serde(rename = "spicSalesOrderId")]
    pub spic_sales_order_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl SalesOrderListEntry {
    pub fn from_row(row: &SalesOrder) -> Self {
        SalesOrderListEntry {
            temp_erp_sales_order_id: row.temp_id.clone(),
            erp_sales_order_id: row.erp_sales_order_id.clone(),
            erp_sales_order_code: row.erp_sales_order_code.clone(),
            spic_sales_order_id: row.order_id.clone(),
            created_at: format_ts(&row.created_at),
            updated_at: format_ts(&row.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SalesOrderAmountResponse {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "tempERPSalesOrderId")]
    pub temp_erp_sales_order_id: String,
    #[serde(rename = "erpSalesOrderId")]
    pub erp_sales_order_id: String,
    #[serde(rename = "erpSalesOrderCode")]
    pub erp_sales_order_code: String,
    #[serde(rename = "spicSalesOrderId")]
    pub spic_sales_order_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    #[serde(rename = "orderValue")]
    pub order_value: f64,
    #[serde(rename = "taxAmount")]
    pub tax_amount: f64,
    #[serde(rename = "totalAmount")]
    pub total_amount: f64,
}
