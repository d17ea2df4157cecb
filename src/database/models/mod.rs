pub mod booking;
pub mod quiz;
pub mod user;

pub use booking::Booking;
pub use quiz::{QuizAnswer, UserStats};
pub use user::User;
