use crate::models::opd_queue::QUEUE_STATUS_COMPLETED;

pub const MINUTES_PER_PATIENT: i64 = 15;

const STATUS_DELETE: &str = "delete";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueAction {
    Delete,
    Complete,
}

impl QueueAction {
    pub fn parse(status: &str) -> Option<Self> {
        match status {
            STATUS_DELETE => Some(QueueAction::Delete),
            QUEUE_STATUS_COMPLETED => Some(QueueAction::Complete),
            _ => None,
        }
    }
}

/// Estimated wait for the holder of `queue_number`.
pub fn wait_time_str(queue_number: i32) -> String {
    format!("{}mins", i64::from(queue_number) * MINUTES_PER_PATIENT)
}

/// Dashboard figure for `waiting` patients currently in the queue.
pub fn average_wait_time_str(waiting: i64) -> String {
    format!("{}m", waiting * MINUTES_PER_PATIENT)
}
