#[cfg(feature = "server")]
pub(crate) mod auth;

mod account;
pub use account::*;

mod users;
pub use users::*;

mod courses;
pub use courses::*;

mod assignments;
pub use assignments::*;

mod attendance;
pub use attendance::*;

mod memorization;
pub use memorization::*;

mod events;
pub use events::*;

mod parents;
pub use parents::*;
