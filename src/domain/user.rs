use crate::domain::UserId;
use serde::{Deserialize, Serialize};

/// Role id that turns a user into a seller.
pub const SELLER_ROLE_ID: u32 = 3;

/// Represents a registered user in the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role_id: Option<u32>,
    pub is_seller: bool,
}

/// Payload for registering a new user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub username: String,
}

/// Payload for updating an existing user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub username: Option<String>,
    pub role_id: Option<u32>,
}

impl User {
    /// Creates a new User instance.
    ///
    /// # Arguments
    /// * `id` - Unique identifier (typically set by the actor system)
    /// * `username` - Login name, unique across the marketplace
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            role_id: None,
            is_seller: false,
        }
    }
}
