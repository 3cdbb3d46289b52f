use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::dto::quote_dto::{
    CreateQuoteRequest, CreateQuoteResponse, ListQuotesQuery, QuoteDecisionRequest,
    QuoteListResponse, QuoteResponse, QuoteSummary,
};
use crate::model::quote::QuoteStatus;
use crate::repository::quote_repo::QuoteFilter;
use crate::service::quote_service::{QuoteDecision, QuoteService, QuoteServiceImpl};
use crate::util::error::HandlerError;

/// POST /quotes
pub async fn create_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Json(payload): Json<CreateQuoteRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    info!("Quote submission received");
    if let Err(e) = payload.validate() {
        return Err(HandlerError {
            error: crate::util::error::HandlerErrorKind::Validation,
            message: format!("Missing required fields: {}", e),
            details: None,
        });
    }

    let created = service.submit_quote(payload.into_submission()).await?;

    let response = CreateQuoteResponse {
        success: true,
        quote: QuoteSummary {
            id: created.id.map(|id| id.to_hex()).unwrap_or_default(),
            quoteNumber: created.quoteNumber,
            status: created.status,
        },
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /quotes?customerId=&status=
pub async fn list_quotes_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Query(params): Query<ListQuotesQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let customer_id = params
        .customer_id
        .as_deref()
        .map(ObjectId::parse_str)
        .transpose()
        .map_err(|_| HandlerError::bad_request("Invalid customerId"))?;
    let status = params
        .status
        .as_deref()
        .map(str::parse::<QuoteStatus>)
        .transpose()
        .map_err(HandlerError::bad_request)?;

    let quotes = service
        .list_quotes(QuoteFilter {
            customer_id,
            status,
        })
        .await?;
    Ok(Json(QuoteListResponse { quotes }))
}

/// GET /admin/quotes
pub async fn admin_list_quotes_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let quotes = service.list_quotes(QuoteFilter::default()).await?;
    Ok(Json(QuoteListResponse { quotes }))
}

/// GET /admin/quotes/{id}
pub async fn get_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = ObjectId::parse_str(&id).map_err(|_| HandlerError::bad_request("Invalid quote id"))?;
    let quote = service.get_quote(id).await?;
    Ok(Json(QuoteResponse { quote }))
}

/// PATCH /admin/quotes/{id}
pub async fn decide_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<QuoteDecisionRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = ObjectId::parse_str(&id).map_err(|_| HandlerError::bad_request("Invalid quote id"))?;
    let quote = service
        .decide_quote(
            id,
            QuoteDecision {
                status: payload.status,
                approved_price: payload.approved_price,
                business_notes: payload.business_notes,
            },
        )
        .await?;
    Ok(Json(QuoteResponse { quote }))
}
