pub mod quote;
pub mod catalog;
pub mod newsletter;
pub mod tracking;
pub mod realisation;
