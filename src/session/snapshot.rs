use tracing::{debug, error};

use crate::models::{RecordError, SessionRecord};
use crate::storage::{SessionStorage, SESSION_KEY};

/// Read the persisted session straight from storage.
///
/// Missing, unreadable or structurally invalid data all come back as `None`;
/// the reason is logged and never surfaced.
pub fn read_persisted_record(storage: &dyn SessionStorage) -> Option<SessionRecord> {
    let raw = match storage.get_item(SESSION_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            error!("Error reading stored session: {}", e);
            return None;
        }
    };

    match SessionRecord::parse(&raw) {
        Ok(record) => record,
        Err(RecordError::Json(e)) => {
            error!("Error parsing stored session: {}", e);
            None
        }
        Err(e) => {
            debug!("Ignoring stored session: {}", e);
            None
        }
    }
}
