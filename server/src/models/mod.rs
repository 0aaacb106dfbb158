pub mod event;
pub mod guest;
pub mod task;
pub mod user;

pub use event::{CreateEventInput, Event, EventStatus, ListEventsQuery, UpdateEventInput};
pub use guest::{Guest, RsvpStatus, UpsertGuestInput};
pub use task::{Task, TaskPriority, TaskStatus, UpsertTaskInput};
pub use user::ActorId;
