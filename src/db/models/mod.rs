mod invite;
mod relation;
mod session;
mod user;
mod workout;

pub use invite::InviteToken;
pub use relation::{Relation, RelationStatus};
pub use session::{Session, SessionStatus, SessionType, SessionView};
pub use user::{ClientProfile, User, UserRole};
pub use workout::{Exercise, Workout};
