pub mod build;
pub mod routes;
pub mod serve;
pub mod step;
