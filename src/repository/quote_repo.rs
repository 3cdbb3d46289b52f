use crate::config::mongo_conf::MongoConfig;
use crate::model::quote::{Quote, QuoteStatus};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use crate::util::time::now_rfc3339;
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use mongodb::options::{FindOptions, IndexOptions};
use mongodb::IndexModel;
use tracing::{error, info};

/// Optional filters for the customer-facing listing. Empty filter lists
/// everything (the admin view).
#[derive(Debug, Clone, Default)]
pub struct QuoteFilter {
    pub customer_id: Option<ObjectId>,
    pub status: Option<QuoteStatus>,
}

/// Fields written by an admin decision. `approved_at` is only Some on the
/// first APPROVED transition.
#[derive(Debug, Clone)]
pub struct QuoteDecisionUpdate {
    pub status: QuoteStatus,
    pub approved_price: Option<f64>,
    pub business_notes: Option<String>,
    pub approved_at: Option<String>,
}

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Insert a quote, stamping id and timestamps. Fails with AlreadyExists
    /// when the quote number collides with an existing one.
    async fn insert(&self, quote: Quote) -> RepositoryResult<Quote>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote>;
    /// List quotes matching the filter, newest first.
    async fn list(&self, filter: QuoteFilter) -> RepositoryResult<Vec<Quote>>;
    async fn apply_decision(
        &self,
        id: ObjectId,
        decision: QuoteDecisionUpdate,
    ) -> RepositoryResult<Quote>;
}

pub struct MongoQuoteRepository {
    collection: mongodb::Collection<Quote>,
}

impl MongoQuoteRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        use mongodb::{
            options::{ClientOptions, Credential},
            Client,
        };

        let mut client_options = ClientOptions::parse(&config.uri).await?;
        client_options.app_name = Some("NeonsignBackend".to_string());
        client_options.max_pool_size = Some(config.pool_size);
        client_options.connect_timeout =
            Some(std::time::Duration::from_secs(config.connection_timeout_secs));

        if let (Some(ref username), Some(ref password)) = (&config.username, &config.password) {
            client_options.credential = Some(
                Credential::builder()
                    .username(username.clone())
                    .password(password.clone())
                    .build(),
            );
        }

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database);
        let collection = db.collection::<Quote>(config.quote_collection());

        // Unique index closes the timestamp+random collision window on
        // quote numbers; insert callers retry on AlreadyExists.
        let index = IndexModel::builder()
            .keys(doc! { "quoteNumber": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        collection.create_index(index, None).await?;

        Ok(MongoQuoteRepository { collection })
    }
}

#[async_trait]
impl QuoteRepository for MongoQuoteRepository {
    #[tracing::instrument(skip(self, quote), fields(quote_number = %quote.quoteNumber))]
    async fn insert(&self, quote: Quote) -> RepositoryResult<Quote> {
        info!("Creating new quote");
        let mut new_quote = quote;
        new_quote.id = Some(ObjectId::new());
        let now = now_rfc3339();
        new_quote.createdAt = Some(now.clone());
        new_quote.updatedAt = Some(now);

        match self.collection.insert_one(new_quote.clone(), None).await {
            Ok(_) => {
                info!("Quote created successfully");
                Ok(new_quote)
            }
            Err(e) => {
                error!("Failed to create quote: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote> {
        let filter = doc! { "_id": id };
        match self.collection.find_one(filter, None).await {
            Ok(Some(quote)) => Ok(quote),
            Ok(None) => {
                error!("Quote not found for ID: {}", id);
                Err(RepositoryError::not_found(format!(
                    "Quote not found for ID: {}",
                    id
                )))
            }
            Err(e) => {
                error!("Failed to fetch quote by ID: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to fetch quote by ID: {}",
                    e
                )))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(filter = ?filter))]
    async fn list(&self, filter: QuoteFilter) -> RepositoryResult<Vec<Quote>> {
        let mut query = doc! {};
        if let Some(customer_id) = filter.customer_id {
            query.insert("customerId", customer_id);
        }
        if let Some(status) = filter.status {
            query.insert("status", status.as_str());
        }

        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .build();

        let cursor = match self.collection.find(query, options).await {
            Ok(cursor) => cursor,
            Err(e) => {
                error!("Failed to list quotes: {}", e);
                return Err(RepositoryError::database(format!(
                    "Failed to list quotes: {}",
                    e
                )));
            }
        };

        let mut quotes = Vec::new();
        let mut cursor = cursor;
        while let Some(quote) = cursor.next().await {
            match quote {
                Ok(q) => quotes.push(q),
                Err(e) => {
                    error!("Failed to deserialize quote: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize quote: {}",
                        e
                    )));
                }
            }
        }
        info!("Fetched {} quotes", quotes.len());
        Ok(quotes)
    }

    #[tracing::instrument(skip(self, decision), fields(id = %id, status = %decision.status))]
    async fn apply_decision(
        &self,
        id: ObjectId,
        decision: QuoteDecisionUpdate,
    ) -> RepositoryResult<Quote> {
        info!("Applying decision to quote");
        let mut set = doc! {
            "status": decision.status.as_str(),
            "updatedAt": now_rfc3339(),
        };
        if let Some(price) = decision.approved_price {
            set.insert("approvedPrice", price);
        }
        if let Some(notes) = decision.business_notes {
            set.insert("businessNotes", notes);
        }
        if let Some(approved_at) = decision.approved_at {
            set.insert("approvedAt", approved_at);
        }

        let filter = doc! { "_id": id };
        let update = doc! { "$set": set };
        match self.collection.update_one(filter, update, None).await {
            // matched_count, not modified_count: a decision that writes the
            // same values is still a successful update
            Ok(result) if result.matched_count > 0 => self.get_by_id(id).await,
            Ok(_) => {
                error!("No quote found to update for ID: {}", id);
                Err(RepositoryError::not_found(format!(
                    "No quote found to update for ID: {}",
                    id
                )))
            }
            Err(e) => {
                error!("Failed to update quote: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to update quote: {}",
                    e
                )))
            }
        }
    }
}
