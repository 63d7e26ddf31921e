//! Fieldserve - client engine for a field-service application
//!
//! This crate provides a unified API for the list and schedule controllers.
//!
//! # Example
//!
//! ```ignore
//! use fieldserve::{ApiClient, Schedule, StaticToken};
//!
//! let api = Arc::new(ApiClient::new("https://backend/api", tokens)?);
//! let schedule = Schedule::new(api.clone(), technician_id, today);
//! schedule.select_index(fieldserve::dates::WINDOW_RADIUS).await;
//! ```

// Re-export the controllers and HTTP surface
pub use fieldserve_client::{
    ApiClient, ClientPages, Debouncer, Event, EventDispatcher, ListSnapshot, PageQuery,
    PageSource, PagedList, ProductPages, Schedule, ScheduleSnapshot, SharedToken, StaticToken,
    TaskSource, TokenProvider,
};

// Re-export core types that embedding applications need
pub use fieldserve_core::dates;
pub use fieldserve_core::{
    ApiError, ApiResult, Client, ClientSummary, Page, Product, StatusStyle, Task, TaskStatus,
};
