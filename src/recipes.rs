//! Recipe list loaded from a single endpoint.

use crate::events::{EventSender, Source};
use crate::network::{QueryParams, RequestClient};
use crate::region::{Completion, CompletionSender, LoadableRegion, PanelHandle, RegionKind};

pub struct RecipeListPage {
    region: LoadableRegion,
    panel: PanelHandle,
}

impl RecipeListPage {
    /// `links` selects the JSON link list over the server-rendered fragment.
    pub fn new(
        path: &str,
        links: bool,
        client: RequestClient,
        completions: CompletionSender,
        events: EventSender,
    ) -> Self {
        let kind = if links {
            RegionKind::RecipeLinks
        } else {
            RegionKind::RecipeList
        };
        let panel = PanelHandle::new(path);
        let region = LoadableRegion::new(
            Source::Recipes,
            path,
            kind,
            client,
            Box::new(panel.clone()),
            completions,
            events,
        );
        Self { region, panel }
    }

    pub fn panel(&self) -> &PanelHandle {
        &self.panel
    }

    pub fn region(&self) -> &LoadableRegion {
        &self.region
    }

    pub fn load(&mut self) {
        self.region.load(QueryParams::new());
    }

    pub fn retry(&mut self) -> bool {
        self.region.retry()
    }

    pub fn handle_completion(&mut self, completion: Completion) -> bool {
        self.region.handle_completion(completion)
    }
}
