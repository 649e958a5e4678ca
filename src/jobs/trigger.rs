//! Daily discovery sweep: find due recurring templates and fan them out as
//! independent work items.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::Result;
use crate::store::Store;

use super::{EventSink, RecurringWorkItem};

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct TriggerSummary {
    pub triggered: usize,
}

/// Queries every due recurring template and emits one work item per row.
/// Discovery is decoupled from execution: a template that fails to enqueue is
/// logged and skipped so the rest of the batch still goes out.
pub fn trigger_recurring_transactions(
    store: &dyn Store,
    events: &dyn EventSink,
    now: DateTime<Utc>,
) -> Result<TriggerSummary> {
    let due = store.due_recurring_transactions(now)?;

    let mut triggered = 0;
    for template in &due {
        let item = RecurringWorkItem {
            transaction_id: template.id,
            user_id: template.user_id,
        };
        match events.emit(item) {
            Ok(()) => triggered += 1,
            Err(err) => {
                warn!(transaction = %template.id, %err, "failed to enqueue recurring work item");
            }
        }
    }

    info!(found = due.len(), triggered, "recurring trigger sweep complete");
    Ok(TriggerSummary { triggered })
}
