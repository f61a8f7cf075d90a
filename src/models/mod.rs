pub mod user;
pub mod stats;
pub mod card;

pub use user::*;
pub use stats::*;
pub use card::*;
