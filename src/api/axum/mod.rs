mod dashboard;
mod error;
mod handlers;
mod middleware;
mod routes;

pub use error::AppError;
pub use middleware::{extract_session_cookie, MaybeSession};
pub use routes::{core_routes, patient_routes, portal_routes, staff_routes, AppState};
