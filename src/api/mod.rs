// ============================================================================
// API Boundary - HTTP surface
// ============================================================================
//
// Wire DTOs, the response envelope, and the actix-web handlers that map
// typed errors onto status codes. Nothing below this module knows about
// HTTP.
//
// ============================================================================

pub mod dto;
pub mod envelope;
pub mod handlers;

pub use envelope::ApiResponse;
pub use handlers::configure;
