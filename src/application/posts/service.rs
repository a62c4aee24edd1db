use std::sync::Arc;

use crate::application::{
    classify::Classifier,
    notify::NotificationService,
    repos::{PostsRepo, PostsWriteRepo},
};

use super::types::{PostLinks, RelayTarget};

#[derive(Clone)]
pub struct PostService {
    pub(crate) reader: Arc<dyn PostsRepo>,
    pub(crate) writer: Arc<dyn PostsWriteRepo>,
    pub(crate) classifier: Arc<dyn Classifier>,
    pub(crate) notifier: NotificationService,
    pub(crate) relay: Option<RelayTarget>,
    pub(crate) links: PostLinks,
}

impl PostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        classifier: Arc<dyn Classifier>,
        notifier: NotificationService,
        links: PostLinks,
    ) -> Self {
        Self {
            reader,
            writer,
            classifier,
            notifier,
            relay: None,
            links,
        }
    }

    pub fn with_relay(mut self, relay: RelayTarget) -> Self {
        self.relay = Some(relay);
        self
    }
}
