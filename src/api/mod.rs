pub mod middleware;
pub mod routes;

pub use middleware::log_request_errors;
pub use routes::{download_get, download_post, info_get, info_post, root};
