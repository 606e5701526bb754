mod error;
mod router;
mod state;

pub use error::HttpError;
pub use router::{build_router, ALLOWED_HEADERS};
pub use state::ServeState;
