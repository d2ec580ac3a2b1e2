pub mod applications;
pub mod auth;
pub mod jobs;
pub mod news;
pub mod portfolio;
pub mod probes;
