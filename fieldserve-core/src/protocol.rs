//! Wire shapes for the backend's REST responses.
//!
//! The backend is not uniform: the clients endpoint nests its page under
//! `clients`, the catalog endpoint splits items and pagination metadata,
//! and the task endpoints wrap everything in a `success` envelope. Each
//! shape is decoded as-is and normalized into [`Page`] where possible.

use crate::models::{Client, Product, Task};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page of a server-side paginated listing.
///
/// Invariant: `current_page <= last_page`; the page where they are equal
/// ends pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// `GET /clients?page&search&sort`
#[derive(Debug, Clone, Deserialize)]
pub struct ClientsEnvelope {
    pub clients: Page<Client>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
}

/// `GET /catalog/products?page&name`
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsEnvelope {
    pub products: Vec<Product>,
    pub pagination: PageMeta,
}

impl ProductsEnvelope {
    pub fn into_page(self) -> Page<Product> {
        Page {
            data: self.products,
            current_page: self.pagination.current_page,
            last_page: self.pagination.last_page,
        }
    }
}

/// `GET /tasks?technician_id&date`
#[derive(Debug, Clone, Deserialize)]
pub struct TasksEnvelope {
    pub success: bool,
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub message: Option<String>,
}

/// `GET /tasks/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct TaskEnvelope {
    pub success: bool,
    pub task: Option<Task>,
    pub message: Option<String>,
}

/// Timestamps returned by the start/finish mutation endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskTimestamps {
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// `PUT /tasks/{id}/start` and `PUT /tasks/{id}/finish`
#[derive(Debug, Clone, Deserialize)]
pub struct TaskActionEnvelope {
    pub success: bool,
    pub task: Option<TaskTimestamps>,
    pub message: Option<String>,
}
