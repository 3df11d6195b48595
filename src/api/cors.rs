//! Cross-origin resource sharing policy

use actix_cors::Cors;

/// Seconds browsers may cache a preflight answer
const PREFLIGHT_MAX_AGE: usize = 3600;

/// Build the CORS middleware
///
/// With no configured origins any origin is allowed.
pub fn cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::permissive();
    }

    allowed_origins.iter().fold(
        Cors::default()
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allow_any_header()
            .max_age(PREFLIGHT_MAX_AGE),
        |cors, origin| cors.allowed_origin(origin),
    )
}
