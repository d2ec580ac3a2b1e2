pub mod applications;
pub mod jobs;
pub mod news;
pub mod portfolio;
pub mod users;
