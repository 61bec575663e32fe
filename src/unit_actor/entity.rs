use crate::actor_framework::Entity;
use crate::domain::{Unit, UnitCreate, UnitId};

impl Entity for Unit {
    const KIND: &'static str = "unit";

    type Id = UnitId;
    type CreatePayload = UnitCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &UnitId { &self.id }

    fn from_create(id: UnitId, params: UnitCreate) -> Result<Self, String> {
        Ok(Self::new(id, params.product_id))
    }

    /// Units are immutable; re-homing one means deleting and recreating it.
    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err(format!("{} cannot be updated", self.id))
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
