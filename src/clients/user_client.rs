use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::domain::{User, UserCreate, UserId, UserPatch};
use crate::store::{ActorStore, DataStore, StoreError};
use crate::user_actor::UserError;

/// Client for registering and managing marketplace users.
#[derive(Clone)]
pub struct UserClient {
    store: Arc<ActorStore>,
    // Serializes the username uniqueness check with the write that follows it
    registration: Arc<Mutex<()>>,
}

impl UserClient {
    pub fn new(store: Arc<ActorStore>) -> Self {
        Self {
            store,
            registration: Arc::new(Mutex::new(())),
        }
    }

    /// Registers a new user. Usernames are unique.
    #[instrument(skip(self))]
    pub async fn register(&self, username: &str) -> Result<User, UserError> {
        let _registration = self.registration.lock().await;
        self.ensure_username_free(username, None).await?;

        let user = self.store
            .create_user(UserCreate { username: username.to_string() })
            .await
            .map_err(user_error)?;
        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>, UserError> {
        debug!("Sending request");
        Ok(self.store.find_user_by_id(id).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, UserError> {
        debug!("Sending request");
        Ok(self.store.list_users().await?)
    }

    #[instrument(skip(self))]
    pub async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, UserError> {
        let _registration = self.registration.lock().await;
        if let Some(username) = patch.username.as_deref() {
            self.ensure_username_free(username, Some(id)).await?;
        }
        let user = self.store.update_user(id, patch).await.map_err(|e| match e {
            StoreError::NotFound { .. } => UserError::NotFound(id),
            e => user_error(e),
        })?;
        info!(is_seller = user.is_seller, "User updated");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: UserId) -> Result<User, UserError> {
        self.store.delete_user(id).await.map_err(|e| match e {
            StoreError::NotFound { .. } => UserError::NotFound(id),
            e => UserError::Store(e),
        })
    }

    async fn ensure_username_free(&self, username: &str, owner: Option<UserId>) -> Result<(), UserError> {
        match self.store.find_user_by_username(username.trim()).await? {
            Some(existing) if Some(existing.id) != owner => {
                warn!(existing = %existing.id, "Username already taken");
                Err(UserError::AlreadyExists(username.trim().to_string()))
            }
            _ => Ok(()),
        }
    }
}

fn user_error(e: StoreError) -> UserError {
    match e {
        StoreError::Rejected { reason, .. } => UserError::ValidationError(reason),
        e => UserError::Store(e),
    }
}
