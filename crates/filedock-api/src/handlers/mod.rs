pub mod health;
pub mod identity;
pub mod multipart;
pub mod uploads;
