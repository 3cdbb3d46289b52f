use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::quote::{Quote, QuoteStatus};
use crate::model::user::User;

/// Quote submission body. Only name, email and shippingAddress are checked,
/// and only for presence; email format is deliberately not validated.
/// company and shippingAddress are accepted but never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequest {
    #[validate(required, length(min = 1, message = "name is required"))]
    pub name: Option<String>,

    #[validate(required, length(min = 1, message = "email is required"))]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub company: Option<String>,
    pub customer_notes: Option<String>,

    #[validate(required, length(min = 1, message = "shippingAddress is required"))]
    pub shipping_address: Option<String>,

    pub custom_text: String,
    pub font_style: String,
    pub color: String,
    pub size: String,
    pub material: String,
    pub backing: Option<String>,
    pub mounting: Option<String>,
    pub power_option: Option<String>,

    /// Client-computed price, persisted as sent. The service recomputes it
    /// for logging but never overrides the submitted value.
    pub calculated_price: f64,
}

/// Validated submission handed from the handler to the service layer.
#[derive(Debug, Clone)]
pub struct QuoteSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub customer_notes: Option<String>,
    pub custom_text: String,
    pub font_style: String,
    pub color: String,
    pub size: String,
    pub material: String,
    pub backing: Option<String>,
    pub mounting: Option<String>,
    pub power_option: Option<String>,
    pub calculated_price: f64,
}

impl CreateQuoteRequest {
    /// Flatten into a submission. Call after `validate()`; the required
    /// fields fall back to empty strings if validation was skipped.
    pub fn into_submission(self) -> QuoteSubmission {
        QuoteSubmission {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone,
            customer_notes: self.customer_notes,
            custom_text: self.custom_text,
            font_style: self.font_style,
            color: self.color,
            size: self.size,
            material: self.material,
            backing: self.backing,
            mounting: self.mounting,
            power_option: self.power_option,
            calculated_price: self.calculated_price,
        }
    }
}

/// Admin decision body for PATCH /admin/quotes/{id}.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDecisionRequest {
    pub status: QuoteStatus,
    pub approved_price: Option<f64>,
    pub business_notes: Option<String>,
}

/// Optional filters on the customer-facing listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuotesQuery {
    pub customer_id: Option<String>,
    pub status: Option<String>,
}

/// Minimal projection of the owning customer, embedded in quote responses.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for CustomerSummary {
    fn from(user: &User) -> Self {
        CustomerSummary {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Full quote as returned by the listing and detail endpoints.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Serialize)]
pub struct QuoteView {
    pub id: String,
    pub quoteNumber: String,
    pub status: QuoteStatus,
    pub customText: String,
    pub fontStyle: String,
    pub color: String,
    pub size: String,
    pub material: String,
    pub backing: Option<String>,
    pub mounting: Option<String>,
    pub powerOption: Option<String>,
    pub calculatedPrice: f64,
    pub approvedPrice: Option<f64>,
    pub customerId: String,
    pub customerNotes: Option<String>,
    pub businessNotes: Option<String>,
    pub createdAt: Option<String>,
    pub updatedAt: Option<String>,
    pub approvedAt: Option<String>,
    pub customer: Option<CustomerSummary>,
}

impl QuoteView {
    pub fn new(quote: Quote, customer: Option<CustomerSummary>) -> Self {
        QuoteView {
            id: quote.id.map(|id| id.to_hex()).unwrap_or_default(),
            quoteNumber: quote.quoteNumber,
            status: quote.status,
            customText: quote.customText,
            fontStyle: quote.fontStyle,
            color: quote.color,
            size: quote.size,
            material: quote.material,
            backing: quote.backing,
            mounting: quote.mounting,
            powerOption: quote.powerOption,
            calculatedPrice: quote.calculatedPrice,
            approvedPrice: quote.approvedPrice,
            customerId: quote.customerId.to_hex(),
            customerNotes: quote.customerNotes,
            businessNotes: quote.businessNotes,
            createdAt: quote.createdAt,
            updatedAt: quote.updatedAt,
            approvedAt: quote.approvedAt,
            customer,
        }
    }
}

/// Minimal echo returned by the submission endpoint.
#[allow(non_snake_case)]
#[derive(Debug, Clone, Serialize)]
pub struct QuoteSummary {
    pub id: String,
    pub quoteNumber: String,
    pub status: QuoteStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateQuoteResponse {
    pub success: bool,
    pub quote: QuoteSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteListResponse {
    pub quotes: Vec<QuoteView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    pub quote: QuoteView,
}
