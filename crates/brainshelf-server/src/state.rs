use std::sync::Arc;

use brainshelf_core::app::{App, CatalogService};
use brainshelf_core::impls::BroadcastEventSink;
use brainshelf_core::ports::IdentityVerifier;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub events: Arc<BroadcastEventSink>,
}

impl AppState {
    /// `events` は `app` の構築時に渡したものと同じ sink であること
    pub fn new(app: &App, events: Arc<BroadcastEventSink>) -> Self {
        Self {
            catalog: app.catalog.clone(),
            verifier: app.verifier.clone(),
            events,
        }
    }
}
