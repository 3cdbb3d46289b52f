use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use rand::Rng;
use tracing::{error, info, instrument, warn};

use crate::dto::quote_dto::{CustomerSummary, QuoteSubmission, QuoteView};
use crate::model::quote::{Quote, QuoteStatus};
use crate::model::user::User;
use crate::pricing::{calculate_price, PricingOptions};
use crate::repository::quote_repo::{QuoteDecisionUpdate, QuoteFilter, QuoteRepository};
use crate::repository::repository_error::RepositoryError;
use crate::repository::user_repo::UserRepository;
use crate::util::error::ServiceError;
use crate::util::time::now_rfc3339;

/// Decision applied by an admin to a pending (or approved) quote.
#[derive(Debug, Clone)]
pub struct QuoteDecision {
    pub status: QuoteStatus,
    pub approved_price: Option<f64>,
    pub business_notes: Option<String>,
}

#[async_trait]
pub trait QuoteService: Send + Sync {
    /// Upsert the customer by email and persist a new PENDING quote.
    async fn submit_quote(&self, submission: QuoteSubmission) -> Result<Quote, ServiceError>;
    /// Customer-facing listing with optional customerId/status filters.
    async fn list_quotes(&self, filter: QuoteFilter) -> Result<Vec<QuoteView>, ServiceError>;
    async fn get_quote(&self, id: ObjectId) -> Result<QuoteView, ServiceError>;
    /// Transition a quote's status, stamping approvedAt on first approval.
    async fn decide_quote(
        &self,
        id: ObjectId,
        decision: QuoteDecision,
    ) -> Result<QuoteView, ServiceError>;
}

pub struct QuoteServiceImpl {
    pub quote_repo: Arc<dyn QuoteRepository>,
    pub user_repo: Arc<dyn UserRepository>,
}

impl QuoteServiceImpl {
    pub fn new(quote_repo: Arc<dyn QuoteRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        QuoteServiceImpl {
            quote_repo,
            user_repo,
        }
    }

    /// Find the customer by email, creating or refreshing the record.
    /// A concurrent signup under the same email loses the insert race on
    /// the unique index and falls back to the winner's record.
    async fn upsert_customer(&self, submission: &QuoteSubmission) -> Result<User, ServiceError> {
        let existing = self
            .user_repo
            .find_by_email(&submission.email)
            .await
            .map_err(ServiceError::from)?;

        match existing {
            Some(user) => {
                let mut updated = user.clone();
                if !submission.name.is_empty() {
                    updated.name = submission.name.clone();
                }
                if let Some(phone) = submission.phone.as_ref().filter(|p| !p.is_empty()) {
                    updated.phone = Some(phone.clone());
                }
                let id = user.id.ok_or_else(|| {
                    ServiceError::InternalError("Stored user has no id".to_string())
                })?;
                self.user_repo
                    .update(id, updated)
                    .await
                    .map_err(ServiceError::from)
            }
            None => {
                let user = User {
                    id: None,
                    email: submission.email.clone(),
                    name: submission.name.clone(),
                    phone: submission.phone.clone(),
                    role: "CUSTOMER".to_string(),
                    created_at: None,
                    updated_at: None,
                };
                match self.user_repo.insert(user).await {
                    Ok(created) => Ok(created),
                    Err(RepositoryError::AlreadyExists(_)) => {
                        info!(email = %submission.email, "Lost signup race, reusing existing user");
                        self.user_repo
                            .find_by_email(&submission.email)
                            .await
                            .map_err(ServiceError::from)?
                            .ok_or_else(|| {
                                ServiceError::InternalError(
                                    "User vanished after duplicate-key insert".to_string(),
                                )
                            })
                    }
                    Err(e) => Err(ServiceError::from(e)),
                }
            }
        }
    }

    /// Build the customer projections for a batch of quotes with one lookup
    /// per distinct customer.
    async fn customer_summaries(
        &self,
        quotes: &[Quote],
    ) -> Result<HashMap<ObjectId, CustomerSummary>, ServiceError> {
        let mut summaries = HashMap::new();
        for quote in quotes {
            if summaries.contains_key(&quote.customerId) {
                continue;
            }
            if let Some(user) = self
                .user_repo
                .find_by_id(&quote.customerId)
                .await
                .map_err(ServiceError::from)?
            {
                summaries.insert(quote.customerId, CustomerSummary::from(&user));
            }
        }
        Ok(summaries)
    }

    async fn into_view(&self, quote: Quote) -> Result<QuoteView, ServiceError> {
        let customer = self
            .user_repo
            .find_by_id(&quote.customerId)
            .await
            .map_err(ServiceError::from)?
            .map(|user| CustomerSummary::from(&user));
        Ok(QuoteView::new(quote, customer))
    }
}

const QUOTE_NUMBER_ATTEMPTS: usize = 3;
const BASE36_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).expect("base36 digits are ASCII")
}

/// `QT-<millis timestamp in base36>-<4 random base36 chars>`. Collisions
/// are improbable but possible; the unique index plus insert retry in
/// submit_quote makes them harmless.
fn generate_quote_number() -> String {
    let timestamp = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| BASE36_ALPHABET[rng.gen_range(0..36)] as char)
        .collect();
    format!("QT-{}-{}", to_base36(timestamp), suffix)
}

#[async_trait]
impl QuoteService for QuoteServiceImpl {
    #[instrument(skip(self, submission), fields(email = %submission.email))]
    async fn submit_quote(&self, submission: QuoteSubmission) -> Result<Quote, ServiceError> {
        info!("Registering new quote");

        let customer = self.upsert_customer(&submission).await?;
        let customer_id = customer.id.ok_or_else(|| {
            ServiceError::InternalError("Customer record has no id".to_string())
        })?;

        // The submitted price is persisted as-is; recompute only to flag
        // tampering or drift between client and server tables.
        let breakdown = calculate_price(PricingOptions {
            text: &submission.custom_text,
            size: &submission.size,
            material: &submission.material,
            backing: submission.backing.as_deref(),
            mounting: submission.mounting.as_deref(),
            power_option: submission.power_option.as_deref(),
        });
        if (breakdown.total - submission.calculated_price).abs() > 1e-9 {
            warn!(
                submitted = submission.calculated_price,
                computed = breakdown.total,
                "Client-submitted price differs from server calculation"
            );
        }

        let mut attempts = 0;
        let created = loop {
            let quote = Quote {
                id: None,
                quoteNumber: generate_quote_number(),
                status: QuoteStatus::Pending,
                customText: submission.custom_text.clone(),
                fontStyle: submission.font_style.clone(),
                color: submission.color.clone(),
                size: submission.size.clone(),
                material: submission.material.clone(),
                backing: submission.backing.clone(),
                mounting: submission.mounting.clone(),
                powerOption: submission.power_option.clone(),
                calculatedPrice: submission.calculated_price,
                approvedPrice: None,
                customerId: customer_id,
                customerNotes: submission.customer_notes.clone(),
                businessNotes: None,
                createdAt: None,
                updatedAt: None,
                approvedAt: None,
            };
            match self.quote_repo.insert(quote).await {
                Ok(created) => break created,
                Err(RepositoryError::AlreadyExists(_)) if attempts < QUOTE_NUMBER_ATTEMPTS => {
                    attempts += 1;
                    warn!(attempts, "Quote number collision, regenerating");
                }
                Err(e) => {
                    error!("Failed to persist quote: {}", e);
                    return Err(ServiceError::from(e));
                }
            }
        };

        info!(quote_number = %created.quoteNumber, "Quote registered successfully");
        Ok(created)
    }

    #[instrument(skip(self), fields(filter = ?filter))]
    async fn list_quotes(&self, filter: QuoteFilter) -> Result<Vec<QuoteView>, ServiceError> {
        let quotes = self
            .quote_repo
            .list(filter)
            .await
            .map_err(ServiceError::from)?;
        let summaries = self.customer_summaries(&quotes).await?;
        Ok(quotes
            .into_iter()
            .map(|quote| {
                let customer = summaries.get(&quote.customerId).cloned();
                QuoteView::new(quote, customer)
            })
            .collect())
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_quote(&self, id: ObjectId) -> Result<QuoteView, ServiceError> {
        let quote = self
            .quote_repo
            .get_by_id(id)
            .await
            .map_err(ServiceError::from)?;
        self.into_view(quote).await
    }

    #[instrument(skip(self, decision), fields(id = %id, status = %decision.status))]
    async fn decide_quote(
        &self,
        id: ObjectId,
        decision: QuoteDecision,
    ) -> Result<QuoteView, ServiceError> {
        let quote = self
            .quote_repo
            .get_by_id(id)
            .await
            .map_err(ServiceError::from)?;

        if !quote.status.can_transition_to(decision.status) {
            return Err(ServiceError::InvalidInput(format!(
                "Invalid status transition: {} -> {}",
                quote.status, decision.status
            )));
        }

        // approvedAt is stamped once, on the first APPROVED transition
        let approved_at = (decision.status == QuoteStatus::Approved && quote.approvedAt.is_none())
            .then(now_rfc3339);

        let updated = self
            .quote_repo
            .apply_decision(
                id,
                QuoteDecisionUpdate {
                    status: decision.status,
                    approved_price: decision.approved_price,
                    business_notes: decision.business_notes,
                    approved_at,
                },
            )
            .await
            .map_err(ServiceError::from)?;

        info!(quote_number = %updated.quoteNumber, status = %updated.status, "Quote decision applied");
        // TODO: notify the customer by email once the mailer exists
        self.into_view(updated).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(36 * 36 + 1), "101");
    }

    #[test]
    fn test_quote_number_format() {
        let number = generate_quote_number();
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "QT");
        assert!(!parts[1].is_empty());
        assert!(parts[1].chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        assert_eq!(parts[2].len(), 4);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
