pub mod debounce;
pub mod events;
pub mod http;
pub mod paged;
pub mod schedule;

pub use debounce::Debouncer;
pub use events::{Event, EventDispatcher};
pub use http::{ApiClient, ClientPages, ProductPages, SharedToken, StaticToken, TokenProvider};
pub use paged::{ListSnapshot, PageQuery, PageSource, PagedList};
pub use schedule::{Schedule, ScheduleSnapshot, TaskSource};
