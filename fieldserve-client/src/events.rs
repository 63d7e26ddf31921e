//! In-process event fan-out from the controllers to the UI collaborator.
//!
//! The UI never polls; it subscribes once per screen session and re-renders
//! from a controller snapshot whenever an event arrives. Callbacks run
//! inline on the emitting task, so they must stay cheap.

use chrono::NaiveDate;
use fieldserve_core::TaskStatus;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A paginated list changed (reset or append).
    ListUpdated { count: usize },
    /// A date bucket in the schedule was filled or replaced.
    DayUpdated { date: NaiveDate, count: usize },
    /// A task changed status after a confirmed mutation.
    TaskUpdated { task_id: i64, status: TaskStatus },
    /// The open detail view received fresh data.
    DetailUpdated { task_id: i64 },
    /// A fetch failed; prior data is still in place.
    ErrorReported { message: String },
}

pub type EventCallback = Box<dyn Fn(&Event) + Send + Sync>;

#[derive(Default)]
pub struct EventDispatcher {
    callbacks: Mutex<Vec<EventCallback>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: EventCallback) {
        match self.callbacks.lock() {
            Ok(mut callbacks) => callbacks.push(callback),
            Err(_) => tracing::error!("failed to acquire callback lock for subscription"),
        }
    }

    pub fn emit_list_updated(&self, count: usize) {
        self.emit(Event::ListUpdated { count });
    }

    pub fn emit_day_updated(&self, date: NaiveDate, count: usize) {
        self.emit(Event::DayUpdated { date, count });
    }

    pub fn emit_task_updated(&self, task_id: i64, status: TaskStatus) {
        self.emit(Event::TaskUpdated { task_id, status });
    }

    pub fn emit_detail_updated(&self, task_id: i64) {
        self.emit(Event::DetailUpdated { task_id });
    }

    pub fn emit_error(&self, message: &str) {
        self.emit(Event::ErrorReported {
            message: message.to_string(),
        });
    }

    fn emit(&self, event: Event) {
        let callbacks = match self.callbacks.lock() {
            Ok(callbacks) => callbacks,
            Err(_) => {
                tracing::error!("failed to acquire callback lock for event emission");
                return;
            }
        };
        for callback in callbacks.iter() {
            callback(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn events_reach_every_subscriber() {
        let dispatcher = EventDispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for _ in 0..2 {
            let seen = seen.clone();
            dispatcher.subscribe(Box::new(move |event| {
                seen.lock().unwrap().push(event.clone());
            }));
        }

        dispatcher.emit_list_updated(3);
        dispatcher.emit_error("boom");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], Event::ListUpdated { count: 3 });
    }
}
