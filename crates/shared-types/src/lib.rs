pub mod error;
pub mod feature_flags;
pub mod models;

// Access control shared by the UI shell and the server extractors
pub mod guard;
pub mod policy;

// School domain
pub mod assignment;
pub mod attendance;
pub mod course;
pub mod event;
pub mod memorization;
pub mod parent;

pub use error::*;
pub use feature_flags::*;
pub use models::*;

pub use assignment::*;
pub use attendance::*;
pub use course::*;
pub use event::*;
pub use memorization::*;
pub use parent::*;
