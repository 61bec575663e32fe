use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate, UserId, UserPatch, SELLER_ROLE_ID};

impl Entity for User {
    const KIND: &'static str = "user";

    type Id = UserId;
    type CreatePayload = UserCreate;
    type Patch = UserPatch;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &UserId { &self.id }

    /// Creates a new User from registration parameters.
    ///
    /// # Arguments
    /// * `id` - Unique identifier for the user
    /// * `params` - Registration parameters containing the username
    fn from_create(id: UserId, params: UserCreate) -> Result<Self, String> {
        let username = params.username.trim();
        if username.is_empty() {
            return Err("Username required".to_string());
        }
        Ok(Self::new(id, username))
    }

    /// Updates the user's profile information.
    ///
    /// # Fields Updated
    /// - `username`: Login name
    /// - `role_id`: Assigned role; the seller role also flags the user as a seller
    fn on_update(&mut self, patch: UserPatch) -> Result<(), String> {
        if let Some(username) = patch.username {
            let username = username.trim();
            if username.is_empty() {
                return Err("Username required".to_string());
            }
            self.username = username.to_string();
        }
        if let Some(role_id) = patch.role_id {
            self.role_id = Some(role_id);
            if role_id == SELLER_ROLE_ID {
                self.is_seller = true;
            }
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
