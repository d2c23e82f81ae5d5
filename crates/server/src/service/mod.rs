//! School operations shared by the REST handlers and the server functions.
//!
//! Every function takes the caller's `Claims`, applies the role policy and
//! visibility rules, validates input, then calls into `repo`.

pub mod assignments;
pub mod attendance;
pub mod courses;
pub mod events;
pub mod guardians;
pub mod memorization;
pub mod users;
