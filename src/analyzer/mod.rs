//! Faceted recipe analyzer

pub mod catalog;
pub mod controller;
pub mod history;
pub mod results;
pub mod state;

pub use catalog::{CHARTS, ChartDefinition, Entities, RANGES, RangeSpec, SET_FILTERS};
pub use controller::AnalyzerController;
pub use history::{ConfigHistory, History};
pub use results::ResultsArea;

use crate::consts::cli_consts::analyzer::ENTITIES_PATH;
use crate::network::{ApiError, QueryParams, RequestClient};

/// Downloads the selectable entities. The analyzer cannot start without them.
pub async fn load_entities(client: &RequestClient) -> Result<Entities, ApiError> {
    client
        .fetch(ENTITIES_PATH, &QueryParams::new())
        .await
        .into_success()?
        .json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::RequestResult;
    use crate::network::transport::MockTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_load_entities() {
        let mut transport = MockTransport::new();
        transport
            .expect_fetch()
            .withf(|url, _| url == "http://site/analyze/entities.json")
            .returning(|_, _| {
                RequestResult::new(200, r#"{"styles": [], "hops": [{"id": "citra", "name": "Citra"}]}"#)
            });
        let client = RequestClient::new(Arc::new(transport), "http://site");
        let entities = load_entities(&client).await.unwrap();
        assert_eq!(entities.hops[0].name, "Citra");
    }

    #[tokio::test]
    /// Anything but 200 aborts the bootstrap.
    async fn test_load_entities_failure() {
        let mut transport = MockTransport::new();
        transport
            .expect_fetch()
            .returning(|_, _| RequestResult::new(503, "maintenance"));
        let client = RequestClient::new(Arc::new(transport), "http://site");
        let err = load_entities(&client).await.unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 503, .. }));
    }
}
