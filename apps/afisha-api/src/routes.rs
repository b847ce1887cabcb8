use axum::{
	Json, Router,
	extract::{
		Path, Query, State,
		rejection::{JsonRejection, PathRejection, QueryRejection},
	},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use afisha_domain::catalog::BlockType;
use afisha_service::{
	BlockRequest, BlockResponse, CreateSlotRequest, Error as ServiceError, SearchRequest,
	SearchResponse, Slot, SlotListResponse,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/blocks/{block_type}", get(default_city_block))
		.route("/v1/cities/{city}/blocks/{block_type}", get(block))
		.route("/v1/search", get(search))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/sponsored_slots", post(create_slot).get(list_slots))
		.route("/v1/admin/sponsored_slots/{slot_id}/deactivate", post(deactivate_slot))
		.with_state(state)
}

#[derive(Debug, Deserialize)]
struct AdminQuery {
	#[serde(default)]
	key: Option<String>,
	#[serde(default)]
	city: Option<String>,
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn block(
	State(state): State<AppState>,
	path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<BlockResponse>, ApiError> {
	let Path((city, raw_block_type)) = path.map_err(ApiError::from_rejection)?;
	let block_type = parse_block_type(&raw_block_type)?;
	let response = state.service.block(BlockRequest { city_slug: city, block_type }).await?;

	Ok(Json(response))
}

/// Serves the block for `catalog.default_city`.
async fn default_city_block(
	State(state): State<AppState>,
	path: Result<Path<String>, PathRejection>,
) -> Result<Json<BlockResponse>, ApiError> {
	let Path(raw_block_type) = path.map_err(ApiError::from_rejection)?;
	let block_type = parse_block_type(&raw_block_type)?;
	let response =
		state.service.block(BlockRequest { city_slug: String::new(), block_type }).await?;

	Ok(Json(response))
}

async fn search(
	State(state): State<AppState>,
	query: Result<Query<SearchRequest>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Query(payload) = query.map_err(ApiError::from_rejection)?;
	let response = state.service.search(payload).await?;

	Ok(Json(response))
}

async fn create_slot(
	State(state): State<AppState>,
	query: Result<Query<AdminQuery>, QueryRejection>,
	payload: Result<Json<CreateSlotRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Slot>), ApiError> {
	let Query(query) = query.map_err(ApiError::from_rejection)?;

	authorize(&state, query.key.as_deref())?;

	let Json(payload) = payload.map_err(ApiError::from_rejection)?;
	let slot = state.service.create_slot(payload).await?;

	Ok((StatusCode::CREATED, Json(slot)))
}

async fn list_slots(
	State(state): State<AppState>,
	query: Result<Query<AdminQuery>, QueryRejection>,
) -> Result<Json<SlotListResponse>, ApiError> {
	let Query(query) = query.map_err(ApiError::from_rejection)?;

	authorize(&state, query.key.as_deref())?;

	let city = query.city.as_deref().map(str::trim).filter(|city| !city.is_empty()).ok_or_else(
		|| {
			json_error(
				StatusCode::BAD_REQUEST,
				"invalid_request",
				"city is required.",
				Some(vec!["city".to_string()]),
			)
		},
	)?;
	let response = state.service.list_slots(city).await?;

	Ok(Json(response))
}

async fn deactivate_slot(
	State(state): State<AppState>,
	path: Result<Path<Uuid>, PathRejection>,
	query: Result<Query<AdminQuery>, QueryRejection>,
) -> Result<Json<Slot>, ApiError> {
	let Query(query) = query.map_err(ApiError::from_rejection)?;

	authorize(&state, query.key.as_deref())?;

	let Path(slot_id) = path.map_err(ApiError::from_rejection)?;
	let slot = state.service.deactivate_slot(slot_id).await?;

	Ok(Json(slot))
}

fn parse_block_type(raw: &str) -> Result<BlockType, ApiError> {
	BlockType::parse(raw).ok_or_else(|| {
		json_error(
			StatusCode::BAD_REQUEST,
			"invalid_request",
			format!("Unknown block type {raw}."),
			Some(vec!["block_type".to_string()]),
		)
	})
}

/// Without a configured key every admin request is rejected.
fn authorize(state: &AppState, key: Option<&str>) -> Result<(), ApiError> {
	match (state.admin_key(), key) {
		(Some(expected), Some(given)) if expected == given => Ok(()),
		_ => Err(json_error(
			StatusCode::UNAUTHORIZED,
			"unauthorized",
			"A valid admin key is required.",
			None,
		)),
	}
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}

	fn from_rejection(rejection: impl ToString) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "invalid_request", rejection.to_string(), None)
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "not_found", message, None),
			ServiceError::Conflict { message } =>
				json_error(StatusCode::CONFLICT, "conflict", message, None),
			ServiceError::Storage { message } => {
				tracing::error!(error = message.as_str(), "Storage error while serving a request.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"storage_error",
					"Storage is unavailable.",
					None,
				)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
