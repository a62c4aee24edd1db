mod error;
mod handlers;
mod state;

pub use error::ApiError;
pub use handlers::{classify, create_post, get_post, list_posts};
pub use state::AppState;
