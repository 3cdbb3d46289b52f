#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use bson::oid::ObjectId;
use std::sync::{Arc, Mutex};

use neonsign_backend::model::quote::Quote;
use neonsign_backend::model::user::User;
use neonsign_backend::repository::quote_repo::{
    QuoteDecisionUpdate, QuoteFilter, QuoteRepository,
};
use neonsign_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use neonsign_backend::repository::user_repo::UserRepository;
use neonsign_backend::router::quote_router::quote_router;
use neonsign_backend::service::quote_service::QuoteServiceImpl;
use neonsign_backend::util::time::now_rfc3339;

/// In-memory stand-in for the Mongo quote collection, honoring the same
/// contract: unique quote numbers, createdAt-descending listing.
#[derive(Default)]
pub struct InMemoryQuoteRepo {
    quotes: Mutex<Vec<Quote>>,
}

impl InMemoryQuoteRepo {
    pub fn snapshot(&self) -> Vec<Quote> {
        self.quotes.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuoteRepository for InMemoryQuoteRepo {
    async fn insert(&self, quote: Quote) -> RepositoryResult<Quote> {
        let mut quotes = self.quotes.lock().unwrap();
        if quotes.iter().any(|q| q.quoteNumber == quote.quoteNumber) {
            return Err(RepositoryError::already_exists(format!(
                "Duplicate key: {}",
                quote.quoteNumber
            )));
        }
        let mut new_quote = quote;
        new_quote.id = Some(ObjectId::new());
        let now = now_rfc3339();
        new_quote.createdAt = Some(now.clone());
        new_quote.updatedAt = Some(now);
        quotes.push(new_quote.clone());
        Ok(new_quote)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote> {
        self.quotes
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.id == Some(id))
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Quote not found for ID: {}", id)))
    }

    async fn list(&self, filter: QuoteFilter) -> RepositoryResult<Vec<Quote>> {
        let mut quotes: Vec<Quote> = self
            .quotes
            .lock()
            .unwrap()
            .iter()
            .filter(|q| {
                filter
                    .customer_id
                    .map(|id| q.customerId == id)
                    .unwrap_or(true)
                    && filter.status.map(|s| q.status == s).unwrap_or(true)
            })
            .cloned()
            .collect();
        quotes.sort_by(|a, b| b.createdAt.cmp(&a.createdAt));
        Ok(quotes)
    }

    async fn apply_decision(
        &self,
        id: ObjectId,
        decision: QuoteDecisionUpdate,
    ) -> RepositoryResult<Quote> {
        let mut quotes = self.quotes.lock().unwrap();
        let quote = quotes
            .iter_mut()
            .find(|q| q.id == Some(id))
            .ok_or_else(|| {
                RepositoryError::not_found(format!("No quote found to update for ID: {}", id))
            })?;
        quote.status = decision.status;
        if decision.approved_price.is_some() {
            quote.approvedPrice = decision.approved_price;
        }
        if decision.business_notes.is_some() {
            quote.businessNotes = decision.business_notes;
        }
        if decision.approved_at.is_some() {
            quote.approvedAt = decision.approved_at;
        }
        quote.updatedAt = Some(now_rfc3339());
        Ok(quote.clone())
    }
}

/// In-memory stand-in for the Mongo user collection with a unique email.
#[derive(Default)]
pub struct InMemoryUserRepo {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepo {
    pub fn snapshot(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepo {
    async fn insert(&self, user: User) -> RepositoryResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::already_exists(format!(
                "Duplicate key: {}",
                user.email
            )));
        }
        let mut new_user = user;
        new_user.id = Some(ObjectId::new());
        let now = now_rfc3339();
        new_user.created_at = Some(now.clone());
        new_user.updated_at = Some(now);
        users.push(new_user.clone());
        Ok(new_user)
    }

    async fn update(&self, id: ObjectId, user: User) -> RepositoryResult<User> {
        let mut users = self.users.lock().unwrap();
        let stored = users
            .iter_mut()
            .find(|u| u.id == Some(id))
            .ok_or_else(|| {
                RepositoryError::not_found(format!("No user found to update for ID: {}", id))
            })?;
        let mut updated = user;
        updated.id = Some(id);
        updated.updated_at = Some(now_rfc3339());
        *stored = updated.clone();
        Ok(updated)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == Some(*id))
            .cloned())
    }
}

pub struct TestHarness {
    pub quote_repo: Arc<InMemoryQuoteRepo>,
    pub user_repo: Arc<InMemoryUserRepo>,
    pub service: Arc<QuoteServiceImpl>,
}

impl TestHarness {
    pub fn new() -> Self {
        let quote_repo = Arc::new(InMemoryQuoteRepo::default());
        let user_repo = Arc::new(InMemoryUserRepo::default());
        let service = Arc::new(QuoteServiceImpl::new(
            quote_repo.clone(),
            user_repo.clone(),
        ));
        TestHarness {
            quote_repo,
            user_repo,
            service,
        }
    }

    pub fn router(&self) -> Router {
        quote_router(self.service.clone())
    }
}
