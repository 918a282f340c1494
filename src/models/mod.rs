//! Domain model module declarations.

pub mod review;
pub mod session;
pub mod suggestion;
pub mod task;

pub use review::{NewReview, Rating, Review};
pub use session::{ApiAck, AuthStatus, Credentials, SessionInfo};
pub use suggestion::{DailyPlan, PlanItem, PlannedTask, Suggestion};
pub use task::{Category, NewTask, Priority, Task, TaskId};
