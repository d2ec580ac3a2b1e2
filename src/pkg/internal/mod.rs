pub mod adaptors;
pub mod applications;
pub mod auth;
pub mod fields;
pub mod jobs;
pub mod news;
pub mod portfolio;
pub mod query;
pub mod transform;
