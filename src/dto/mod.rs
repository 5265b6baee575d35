pub mod quote_dto;
pub mod newsletter_dto;
pub mod tracking_dto;
pub mod realisation_dto;
