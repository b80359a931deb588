//! Farmer registration and lookup, served in two flavors: `customers` routes
//! allocate `customer_id`, `vendors` routes allocate `vendor_id`. Both read
//! and write the same `farmer_details` table, so one implementation carries
//! both, parameterized by the code field.

use crate::codegen::CodeField;
use crate::error::AppError;
use crate::handlers::ListQuery;
use crate::models::farmers::{
    CreateFarmerPayload, CreateFarmerResponse, FarmerDetail, FarmerDetailResponse, FarmerSummary,
};
use crate::response::{failure_body, paginated};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

const CREATED_MESSAGE: &str = "Farmer detail created successfully";

const INSERT_FARMER: &str = r#"
    INSERT INTO farmer_details (
        temp_id, coop_id, farmer_id, first_name, last_name, mobile_number,
        region_id, region_part_id, settlement_id, settlement_part_id,
        custom_geography_structure1_id, custom_geography_structure2_id,
        zip_code, farmer_kyc_type_id, farmer_kyc_type, farmer_kyc_id,
        club_id, club_name, club_leader_farmer_id
    ) VALUES (
        $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
        $11, $12, $13, $14, $15, $16, $17, $18, $19
    )
    RETURNING *
"#;

pub async fn create_customer(
    State(state): State<AppState>,
    Path(coop_id): Path<String>,
    Json(payload): Json<CreateFarmerPayload>,
) -> Result<Response, AppError> {
    create_farmer(state, coop_id, payload, CodeField::CustomerId).await
}

pub async fn create_vendor(
    State(state): State<AppState>,
    Path(coop_id): Path<String>,
    Json(payload): Json<CreateFarmerPayload>,
) -> Result<Response, AppError> {
    create_farmer(state, coop_id, payload, CodeField::VendorId).await
}

pub async fn list_customers(
    State(state): State<AppState>,
    Path(coop_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    list_farmers(state, coop_id, query, CodeField::CustomerId).await
}

pub async fn list_vendors(
    State(state): State<AppState>,
    Path(coop_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    list_farmers(state, coop_id, query, CodeField::VendorId).await
}

pub async fn get_farmer(
    State(state): State<AppState>,
    Path((coop_id, farmer_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    if !state.config.coop_allowed(&coop_id) {
        let body = json!({ "Message": "The indicated cooperative does not exist." });
        return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
    }

    let row: Option<FarmerDetail> =
        sqlx::query_as("SELECT * FROM farmer_details WHERE coop_id = $1 AND farmer_id = $2")
            .bind(&coop_id)
            .bind(&farmer_id)
            .fetch_optional(&state.pool)
            .await?;

    // Unknown farmers answer 200 with a placeholder body; the caller treats
    // an empty EntityID as "not registered yet".
    let body = match row {
        Some(row) => FarmerDetailResponse::from_row(&row),
        None => FarmerDetailResponse::placeholder(&farmer_id, &coop_id),
    };
    Ok(Json(body).into_response())
}

async fn create_farmer(
    state: AppState,
    coop_id: String,
    payload: CreateFarmerPayload,
    field: CodeField,
) -> Result<Response, AppError> {
    // Re-creating a farmer whose code is still pending is not an error: the
    // allocation is queued again and the existing row is answered as created.
    let pending: Option<FarmerDetail> = sqlx::query_as(&format!(
        "SELECT * FROM farmer_details WHERE farmer_id = $1 AND coop_id = $2 AND {} = ''",
        field.column()
    ))
    .bind(&payload.farmer_id)
    .bind(&coop_id)
    .fetch_optional(&state.pool)
    .await?;
    if let Some(row) = pending {
        state.allocator.enqueue(field, row.id);
        let response = CreateFarmerResponse {
            success: true,
            data: FarmerSummary::from_row(&row, CREATED_MESSAGE),
        };
        return Ok((StatusCode::CREATED, Json(response)).into_response());
    }

    if let Err(message) = validate_new_farmer(&payload) {
        return Ok(reject(message, &payload.farmer_id));
    }

    if !payload.farmer_kyc_id.is_empty() {
        let (kyc_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM farmer_details WHERE farmer_kyc_id = $1")
                .bind(&payload.farmer_kyc_id)
                .fetch_one(&state.pool)
                .await?;
        if kyc_count > 0 {
            return Ok(reject(
                &format!(
                    "Farmer with the given KYC ID {} already exists.",
                    payload.farmer_kyc_id
                ),
                &payload.farmer_id,
            ));
        }
    }

    if !state.config.coop_allowed(&coop_id) {
        return Ok(reject(
            "The indicated cooperative does not exist.",
            &payload.farmer_id,
        ));
    }

    let (dup_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM farmer_details WHERE farmer_id = $1 AND coop_id = $2")
            .bind(&payload.farmer_id)
            .bind(&coop_id)
            .fetch_one(&state.pool)
            .await?;
    if dup_count > 0 {
        return Ok(reject(
            &format!(
                "The Farmer ID {} is already registered in the cooperative {}.",
                payload.farmer_id, coop_id
            ),
            &payload.farmer_id,
        ));
    }

    let row: FarmerDetail = sqlx::query_as(INSERT_FARMER)
        .bind(Uuid::new_v4().to_string())
        .bind(&coop_id)
        .bind(&payload.farmer_id)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(&payload.mobile_number)
        .bind(&payload.region_id)
        .bind(&payload.region_part_id)
        .bind(payload.settlement_id)
        .bind(payload.settlement_part_id)
        .bind(payload.custom_geography_structure1_id)
        .bind(payload.custom_geography_structure2_id)
        .bind(&payload.zip_code)
        .bind(payload.farmer_kyc_type_id)
        .bind(&payload.farmer_kyc_type)
        .bind(&payload.farmer_kyc_id)
        .bind(&payload.club_id)
        .bind(&payload.club_name)
        .bind(&payload.club_leader_farmer_id)
        .fetch_one(&state.pool)
        .await?;

    state.allocator.enqueue(field, row.id);

    let response = CreateFarmerResponse {
        success: true,
        data: FarmerSummary::from_row(&row, CREATED_MESSAGE),
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// List farmers of a cooperative whose code is still unassigned.
async fn list_farmers(
    state: AppState,
    coop_id: String,
    query: ListQuery,
    field: CodeField,
) -> Result<Response, AppError> {
    let (from, to) = query.updated_range()?;
    let (page, limit) = query.page_and_limit();

    let filter = format!(
        "coop_id = $1 AND {} = '' \
         AND ($2::timestamptz IS NULL OR updated_at >= $2) \
         AND ($3::timestamptz IS NULL OR updated_at <= $3)",
        field.column()
    );

    let (total,): (i64,) = sqlx::query_as(&format!(
        "SELECT COUNT(*) FROM farmer_details WHERE {}",
        filter
    ))
    .bind(&coop_id)
    .bind(from)
    .bind(to)
    .fetch_one(&state.pool)
    .await?;

    let rows: Vec<FarmerDetail> = sqlx::query_as(&format!(
        "SELECT * FROM farmer_details WHERE {} ORDER BY id LIMIT $4 OFFSET $5",
        filter
    ))
    .bind(&coop_id)
    .bind(from)
    .bind(to)
    .bind(limit)
    .bind(query.offset())
    .fetch_all(&state.pool)
    .await?;

    let data: Vec<FarmerSummary> = rows
        .iter()
        .map(|row| FarmerSummary::from_row(row, ""))
        .collect();
    Ok(Json(paginated(data, page, limit, total)).into_response())
}

/// Presence checks that need no database access. Returns the rejection
/// message of the first failing rule.
fn validate_new_farmer(payload: &CreateFarmerPayload) -> Result<(), &'static str> {
    if payload.farmer_id.is_empty() {
        return Err("You must provide a Farmer ID.");
    }
    if payload.first_name.is_empty() || payload.last_name.is_empty() {
        return Err("You must provide the first and last name.");
    }
    if payload.farmer_kyc_id.is_empty() && payload.club_leader_farmer_id.is_empty() {
        return Err("Either farmer_kyc_id or clubLeaderFarmerId must be provided.");
    }
    Ok(())
}

fn reject(message: &str, farmer_id: &str) -> Response {
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
    let body = failure_body(json!({
        "tempERPCustomerId": "0",
        "erpCustomerId": "",
        "farmerId": farmer_id,
        "createdAt": now,
        "updatedAt": now,
        "Message": message,
    }));
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_payload() -> CreateFarmerPayload {
        CreateFarmerPayload {
            farmer_id: "F-1001".into(),
            first_name: "Ana".into(),
            last_name: "Silva".into(),
            farmer_kyc_id: "KYC-7".into(),
            ..Default::default()
        }
    }

    #[test]
    fn complete_payload_passes() {
        assert!(validate_new_farmer(&complete_payload()).is_ok());
    }

    #[test]
    fn missing_farmer_id_is_rejected_first() {
        let payload = CreateFarmerPayload {
            farmer_id: String::new(),
            ..complete_payload()
        };
        assert_eq!(
            validate_new_farmer(&payload),
            Err("You must provide a Farmer ID.")
        );
    }

    #[test]
    fn either_name_missing_is_rejected() {
        for (first, last) in [("", "Silva"), ("Ana", "")] {
            let payload = CreateFarmerPayload {
                first_name: first.into(),
                last_name: last.into(),
                ..complete_payload()
            };
            assert_eq!(
                validate_new_farmer(&payload),
                Err("You must provide the first and last name.")
            );
        }
    }

    #[test]
    fn kyc_or_club_leader_is_required() {
        let payload = CreateFarmerPayload {
            farmer_kyc_id: String::new(),
            club_leader_farmer_id: String::new(),
            ..complete_payload()
        };
        assert_eq!(
            validate_new_farmer(&payload),
            Err("Either farmer_kyc_id or clubLeaderFarmerId must be provided.")
        );
    }

    #[test]
    fn club_leader_alone_satisfies_the_identity_rule() {
        let payload = CreateFarmerPayload {
            farmer_kyc_id: String::new(),
            club_leader_farmer_id: "F-900".into(),
            ..complete_payload()
        };
        assert!(validate_new_farmer(&payload).is_ok());
    }
}
