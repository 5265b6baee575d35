pub mod email;
pub mod session;
pub mod logger;
pub mod error;
