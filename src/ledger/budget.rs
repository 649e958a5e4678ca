use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A monthly spending ceiling for a user's default account.
///
/// `last_alert_sent`, when set, records the most recent calendar month in
/// which an over-threshold alert went out; the alert handler sends at most
/// one alert per budget per calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub last_alert_sent: Option<DateTime<Utc>>,
}

impl Budget {
    pub fn new(user_id: Uuid, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            last_alert_sent: None,
        }
    }

    pub fn with_last_alert_sent(mut self, at: DateTime<Utc>) -> Self {
        self.last_alert_sent = Some(at);
        self
    }
}
