pub mod quote_service;
pub mod catalog_service;
pub mod newsletter_service;
pub mod tracking_service;
pub mod realisation_service;
