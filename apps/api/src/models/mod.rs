pub mod message;
pub mod profile;
pub mod question;
