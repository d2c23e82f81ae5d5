//! Database access. One module per table family; every function takes the
//! pool explicitly and maps sqlx errors through `SqlxErrorExt`.

pub mod assignment;
pub mod attendance;
pub mod course;
pub mod enrollment;
pub mod event;
pub mod lesson;
pub mod memorization;
pub mod parent;
pub mod refresh_token;
pub mod submission;
pub mod user;
