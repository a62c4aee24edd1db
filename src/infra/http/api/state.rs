use std::sync::Arc;

use crate::application::posts::PostService;

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
}

impl AppState {
    pub fn new(posts: Arc<PostService>) -> Self {
        Self { posts }
    }
}
