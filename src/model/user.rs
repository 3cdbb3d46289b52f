use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Customer account, created lazily on first quote submission.
/// Email is the natural key; a unique index enforces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: String, // "CUSTOMER" or "ADMIN", never enforced by handlers
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
