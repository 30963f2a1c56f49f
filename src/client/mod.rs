//! REST client for the backend API

mod api;
mod envelope;
mod resources;

pub use api::ApiClient;
pub use envelope::ApiResponse;
pub use resources::Resource;
