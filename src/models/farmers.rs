//! Farmer rows and DTOs. One `farmer_details` row serves both the customer
//! and the vendor flavor of the API; only the allocated code field differs.

use super::format_ts;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct FarmerDetail {
    pub id: i64,
    pub temp_id: String,
    pub coop_id: String,
    pub customer_id: String,
    pub vendor_id: String,
    pub farmer_id: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile_number: String,
    pub region_id: String,
    pub region_part_id: String,
    pub settlement_id: i64,
    pub settlement_part_id: i64,
    pub custom_geography_structure1_id: i64,
    pub custom_geography_structure2_id: i64,
    pub zip_code: String,
    pub farmer_kyc_type_id: i64,
    pub farmer_kyc_type: String,
    pub farmer_kyc_id: String,
    pub club_id: String,
    pub club_name: String,
    pub club_leader_farmer_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cust_id_update_at: Option<DateTime<Utc>>,
    pub vendor_id_update_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateFarmerPayload {
    #[serde(rename = "farmerId", default)]
    pub farmer_id: String,
    #[serde(rename = "firstName", default)]
    pub first_name: String,
    #[serde(rename = "lastName", default)]
    pub last_name: String,
    #[serde(rename = "mobile_number", default)]
    pub mobile_number: String,
    #[serde(rename = "regionId", default)]
    pub region_id: String,
    #[serde(rename = "regionPartId", default)]
    pub region_part_id: String,
    #[serde(rename = "settlementId", default)]
    pub settlement_id: i64,
    #[serde(rename = "settlementPartId", default)]
    pub settlement_part_id: i64,
    #[serde(rename = "custom_geography_structure1_id", default)]
    pub custom_geography_structure1_id: i64,
    #[serde(rename = "custom_geography_structure2_id", default)]
    pub custom_geography_structure2_id: i64,
    #[serde(rename = "zipCode", default)]
    pub zip_code: String,
    #[serde(rename = "farmer_kyc_type_id", default)]
    pub farmer_kyc_type_id: i64,
    #[serde(rename = "farmer_kyc_type", default)]
    pub farmer_kyc_type: String,
    #[serde(rename = "farmer_kyc_id", default)]
    pub farmer_kyc_id: String,
    #[serde(rename = "clubId", default)]
    pub club_id: String,
    #[serde(rename = "clubName", default)]
    pub club_name: String,
    #[serde(rename = "clubLeaderFarmerId", default)]
    pub club_leader_farmer_id: String,
}

/// Row projection used in create responses and lists.
#[derive(Debug, Serialize)]
pub struct FarmerSummary {
    #[serde(rename = "tempERPCustomerId")]
    pub temp_erp_customer_id: String,
    #[serde(rename = "erpCustomerId")]
    pub erp_customer_id: String,
    #[serde(rename = "erpVendorId")]
    pub erp_vendor_id: String,
    #[serde(rename = "farmerId")]
    pub farmer_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl FarmerSummary {
    pub fn from_row(row: &FarmerDetail, message: &str) -> Self {
        FarmerSummary {
            temp_erp_customer_id: row.temp_id.clone(),
            erp_customer_id: row.customer_id.clone(),
            erp_vendor_id: row.vendor_id.clone(),
            farmer_id: row.farmer_id.clone(),
            created_at: format_ts(&row.created_at),
            updated_at: format_ts(&row.updated_at),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateFarmerResponse {
    pub success: bool,
    pub data: FarmerSummary,
}

#[derive(Debug, Serialize)]
pub struct BankDetailsInfo {
    #[serde(rename = "IBAN")]
    pub iban: String,
    #[serde(rename = "SWIFT")]
    pub swift: String,
}

/// Detailed farmer view. Unknown farmers get a placeholder body with 200, as
/// the upstream contract expects.
#[derive(Debug, Serialize)]
pub struct FarmerDetailResponse {
    #[serde(rename = "FarmerID")]
    pub farmer_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "MobileNumber")]
    pub mobile_number: String,
    #[serde(rename = "Cooperative")]
    pub cooperative: String,
    #[serde(rename = "SettlementID")]
    pub settlement_id: i64,
    #[serde(rename = "SettlementPartID")]
    pub settlement_part_id: i64,
    #[serde(rename = "ZipCode")]
    pub zip_code: String,
    #[serde(rename = "FarmerKYCTypeID")]
    pub farmer_kyc_type_id: i64,
    #[serde(rename = "FarmerKYCType")]
    pub farmer_kyc_type: String,
    #[serde(rename = "FarmerKYCID")]
    pub farmer_kyc_id: String,
    #[serde(rename = "ClubID")]
    pub club_id: String,
    #[serde(rename = "ClubLeaderFarmerID")]
    pub club_leader_farmer_id: String,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "EntityID")]
    pub entity_id: String,
    #[serde(rename = "CustomerCode")]
    pub customer_code: String,
    #[serde(rename = "VendorCode")]
    pub vendor_code: String,
    #[serde(rename = "CreatedDate")]
    pub created_date: String,
    #[serde(rename = "UpdatedDate")]
    pub updated_date: String,
    #[serde(rename = "BankDetails")]
    pub bank_details: BankDetailsInfo,
}

impl FarmerDetailResponse {
    pub fn from_row(row: &FarmerDetail) -> Self {
        FarmerDetailResponse {
            farmer_id: row.farmer_id.clone(),
            name: format!("{} {}", row.first_name, row.last_name),
            mobile_number: row.mobile_number.clone(),
            cooperative: row.coop_id.clone(),
            settlement_id: row.settlement_id,
            settlement_part_id: row.settlement_part_id,
            zip_code: row.zip_code.clone(),
            farmer_kyc_type_id: row.farmer_kyc_type_id,
            farmer_kyc_type: row.farmer_kyc_type.clone(),
            farmer_kyc_id: row.farmer_kyc_id.clone(),
            club_id: row.club_id.clone(),
            club_leader_farmer_id: row.club_leader_farmer_id.clone(),
            message: "Farmer detail fetched successfully".into(),
            entity_id: row.temp_id.clone(),
            customer_code: row.customer_id.clone(),
            vendor_code: row.vendor_id.clone(),
            created_date: format_ts(&row.created_at),
            updated_date: format_ts(&row.updated_at),
            bank_details: BankDetailsInfo {
                iban: String::new(),
                swift: String::new(),
            },
        }
    }

    pub fn placeholder(farmer_id: &str, coop_id: &str) -> Self {
        FarmerDetailResponse {
            farmer_id: farmer_id.to_string(),
            name: String::new(),
            mobile_number: String::new(),
            cooperative: coop_id.to_string(),
            settlement_id: 0,
            settlement_part_id: 0,
            zip_code: String::new(),
            farmer_kyc_type_id: 0,
            farmer_kyc_type: String::new(),
            farmer_kyc_id: String::new(),
            club_id: String::new(),
            club_leader_farmer_id: String::new(),
            message: String::new(),
            entity_id: String::new(),
            customer_code: String::new(),
            vendor_code: String::new(),
            created_date: super::EPOCH_PLACEHOLDER.into(),
            updated_date: super::EPOCH_PLACEHOLDER.into(),
            bank_details: BankDetailsInfo {
                iban: String::new(),
                swift: String::new(),
            },
        }
    }
}
