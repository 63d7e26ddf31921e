//! Rolling date-window controller for the tasks view.
//!
//! Maintains a fixed 21-day window of calendar days, a per-day task cache
//! that lives for the screen session, and the task-status lifecycle. The
//! cache is only ever invalidated by an explicit refresh of the focused day
//! or wholesale by a jump; failed fetches are not cached, so revisiting a
//! day retries it.

use crate::events::EventDispatcher;
use async_trait::async_trait;
use chrono::NaiveDate;
use fieldserve_core::{dates, ApiError, ApiResult, Task, TaskStatus, TaskTimestamps};
use futures_util::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

/// The task endpoints the schedule needs. Implemented over HTTP by
/// [`crate::http::ApiClient`] and by in-memory fakes in tests.
#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn tasks_for_day(&self, technician_id: i64, date: NaiveDate) -> ApiResult<Vec<Task>>;
    async fn task_detail(&self, task_id: i64) -> ApiResult<Task>;
    async fn start_task(&self, task_id: i64) -> ApiResult<TaskTimestamps>;
    async fn finish_task(&self, task_id: i64) -> ApiResult<TaskTimestamps>;
}

struct ScheduleState {
    dates: Vec<NaiveDate>,
    focused: usize,
    tasks_by_date: HashMap<NaiveDate, Vec<Task>>,
    /// Dates with a request on the wire; blocks duplicate fetches.
    in_flight: HashSet<NaiveDate>,
    detail: Option<Task>,
    error: Option<String>,
    generation: u64,
}

/// Read-only view handed to the UI collaborator.
#[derive(Debug, Clone)]
pub struct ScheduleSnapshot {
    pub dates: Vec<NaiveDate>,
    pub focused: usize,
    /// The focused day's bucket; empty when not yet fetched.
    pub tasks: Vec<Task>,
    pub detail: Option<Task>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct Schedule {
    state: Mutex<ScheduleState>,
    source: Arc<dyn TaskSource>,
    technician_id: i64,
    events: Arc<EventDispatcher>,
}

impl Schedule {
    /// A fresh window centered on `today`. Nothing is fetched until the UI
    /// focuses a day.
    pub fn new(source: Arc<dyn TaskSource>, technician_id: i64, today: NaiveDate) -> Self {
        Self {
            state: Mutex::new(ScheduleState {
                dates: dates::window_around(today),
                focused: dates::WINDOW_RADIUS,
                tasks_by_date: HashMap::new(),
                in_flight: HashSet::new(),
                detail: None,
                error: None,
                generation: 0,
            }),
            source,
            technician_id,
            events: Arc::new(EventDispatcher::new()),
        }
    }

    pub fn events(&self) -> Arc<EventDispatcher> {
        self.events.clone()
    }

    /// Focus a tab and fetch it plus its immediate neighbors, skipping any
    /// date already cached or in flight.
    pub async fn select_index(&self, index: usize) {
        let targets = {
            let mut state = self.state.lock().await;
            if index >= state.dates.len() {
                tracing::warn!(index, len = state.dates.len(), "select out of window");
                return;
            }
            state.focused = index;
            let mut targets = vec![state.dates[index]];
            if index > 0 {
                targets.push(state.dates[index - 1]);
            }
            if index + 1 < state.dates.len() {
                targets.push(state.dates[index + 1]);
            }
            targets
        };
        self.fetch_days(targets, false).await;
    }

    /// Regenerate the window centered on `date`. The whole cache is dropped;
    /// in-flight responses from the old window are discarded on arrival.
    pub async fn jump_to(&self, date: NaiveDate) {
        {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.dates = dates::window_around(date);
            state.focused = dates::WINDOW_RADIUS;
            state.tasks_by_date.clear();
            state.in_flight.clear();
            state.error = None;
        }
        tracing::info!(%date, "date window recentered");
        self.select_index(dates::WINDOW_RADIUS).await;
    }

    /// Idempotent single-day fetch: cached days (including cached-empty
    /// ones) and days already on the wire are left alone.
    pub async fn fetch_day(&self, date: NaiveDate) {
        self.fetch_days(vec![date], false).await;
    }

    /// Re-fetch the focused day bypassing the cache; the reconciliation
    /// path after a task mutation.
    pub async fn refresh_focused(&self) {
        let date = {
            let state = self.state.lock().await;
            state.dates[state.focused]
        };
        self.fetch_days(vec![date], true).await;
    }

    /// Load the full task record (with its client) into the detail slot.
    pub async fn open_detail(&self, task_id: i64) {
        match self.source.task_detail(task_id).await {
            Ok(task) => {
                let mut state = self.state.lock().await;
                state.detail = Some(task);
                self.events.emit_detail_updated(task_id);
            }
            Err(err) => {
                tracing::warn!(task_id, error = %err, "task detail fetch failed");
                let message = err.user_message();
                self.state.lock().await.error = Some(message.clone());
                self.events.emit_error(&message);
            }
        }
    }

    /// Close the detail view and reconcile the focused day with the server.
    pub async fn close_detail(&self) {
        self.state.lock().await.detail = None;
        self.refresh_focused().await;
    }

    /// `pending -> in-progress`. Rejected locally when the cached status
    /// already proves the transition illegal; otherwise server-authoritative.
    pub async fn start_task(&self, task_id: i64) -> ApiResult<()> {
        self.transition(task_id, "start").await
    }

    /// `in-progress -> done`.
    pub async fn finish_task(&self, task_id: i64) -> ApiResult<()> {
        self.transition(task_id, "finish").await
    }

    pub async fn focused_date(&self) -> NaiveDate {
        let state = self.state.lock().await;
        state.dates[state.focused]
    }

    pub async fn tasks_for(&self, date: NaiveDate) -> Option<Vec<Task>> {
        self.state.lock().await.tasks_by_date.get(&date).cloned()
    }

    pub async fn snapshot(&self) -> ScheduleSnapshot {
        let state = self.state.lock().await;
        let focused_date = state.dates[state.focused];
        ScheduleSnapshot {
            dates: state.dates.clone(),
            focused: state.focused,
            tasks: state
                .tasks_by_date
                .get(&focused_date)
                .cloned()
                .unwrap_or_default(),
            detail: state.detail.clone(),
            loading: !state.in_flight.is_empty(),
            error: state.error.clone(),
        }
    }

    async fn fetch_days(&self, candidates: Vec<NaiveDate>, bypass_cache: bool) {
        let (generation, targets) = {
            let mut state = self.state.lock().await;
            let mut targets = Vec::new();
            for date in candidates {
                if state.in_flight.contains(&date) {
                    continue;
                }
                if !bypass_cache && state.tasks_by_date.contains_key(&date) {
                    continue;
                }
                state.in_flight.insert(date);
                targets.push(date);
            }
            (state.generation, targets)
        };
        if targets.is_empty() {
            return;
        }

        let fetches = targets.into_iter().map(|date| async move {
            (date, self.source.tasks_for_day(self.technician_id, date).await)
        });
        let results = join_all(fetches).await;

        let mut state = self.state.lock().await;
        let stale = state.generation != generation;
        for (date, result) in results {
            state.in_flight.remove(&date);
            if stale {
                tracing::debug!(%date, "discarding tasks from a superseded window");
                continue;
            }
            match result {
                Ok(tasks) => {
                    // An empty day is cached too, so revisiting it does not
                    // re-fetch.
                    let count = tasks.len();
                    state.tasks_by_date.insert(date, tasks);
                    self.events.emit_day_updated(date, count);
                }
                Err(err) => {
                    // One failed neighbor must not blank the others; its
                    // date stays uncached and is retried on the next visit.
                    tracing::warn!(%date, error = %err, "day fetch failed");
                    let message = err.user_message();
                    state.error = Some(message.clone());
                    self.events.emit_error(&message);
                }
            }
        }
    }

    async fn transition(&self, task_id: i64, action: &'static str) -> ApiResult<()> {
        {
            let state = self.state.lock().await;
            if let Some(status) = Self::cached_status(&state, task_id) {
                let legal = match action {
                    "start" => status.can_start(),
                    _ => status.can_finish(),
                };
                if !legal {
                    return Err(ApiError::IllegalTransition {
                        action,
                        from: status,
                    });
                }
            }
        }

        // No optimistic write: the cache is only patched after the server
        // confirms.
        let stamps = match action {
            "start" => self.source.start_task(task_id).await?,
            _ => self.source.finish_task(task_id).await?,
        };
        let status = match action {
            "start" => TaskStatus::InProgress,
            _ => TaskStatus::Done,
        };

        let mut state = self.state.lock().await;
        // A task normally lives in exactly one bucket, but the patch sweeps
        // all of them.
        for tasks in state.tasks_by_date.values_mut() {
            for task in tasks.iter_mut().filter(|task| task.id == task_id) {
                Self::apply_transition(task, status, &stamps);
            }
        }
        if let Some(detail) = state.detail.as_mut() {
            if detail.id == task_id {
                Self::apply_transition(detail, status, &stamps);
            }
        }
        self.events.emit_task_updated(task_id, status);
        tracing::info!(task_id, status = %status, "task transition confirmed");
        Ok(())
    }

    fn apply_transition(task: &mut Task, status: TaskStatus, stamps: &TaskTimestamps) {
        task.status = status;
        if let Some(started_at) = stamps.started_at {
            task.started_at = Some(started_at);
        }
        if let Some(finished_at) = stamps.finished_at {
            task.finished_at = Some(finished_at);
        }
    }

    fn cached_status(state: &ScheduleState, task_id: i64) -> Option<TaskStatus> {
        if let Some(detail) = state.detail.as_ref() {
            if detail.id == task_id {
                return Some(detail.status);
            }
        }
        state
            .tasks_by_date
            .values()
            .flatten()
            .find(|task| task.id == task_id)
            .map(|task| task.status)
    }
}
