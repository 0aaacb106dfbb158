//! Ownership-scoped operations on events and their children.
//!
//! Every service takes the acting user explicitly and re-checks ownership of
//! the parent event through [`AccessGuard`] before touching any row.

pub mod details;
pub mod events;
pub mod guard;
pub mod guests;
pub mod tasks;

pub use details::EventDetails;
pub use events::{EventList, EventService};
pub use guard::AccessGuard;
pub use guests::GuestService;
pub use tasks::TaskService;
