use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-owned money account. The job core only ever mutates `balance`, and
/// only through the atomic materialization unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub balance: f64,
    /// At most one default account per user, enforced by the owning app.
    pub is_default: bool,
}

impl Account {
    pub fn new(user_id: Uuid, name: impl Into<String>, balance: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            balance,
            is_default: false,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}
