//! Item Index Handler

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use shopfront_app::context::AppContext;

use crate::{
    extensions::*,
    items::{errors::into_status_error, get::ItemResponse},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ItemsResponse {
    /// The list of items
    pub items: Vec<ItemResponse>,
}

/// Item Index Handler
///
/// Returns every item currently in the catalog.
#[endpoint(tags("items"), summary = "List Items")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ItemsResponse>, StatusError> {
    let app = depot.obtain_or_500::<AppContext>()?;

    let items = app
        .catalog
        .list_items()
        .await
        .map_err(into_status_error)?;

    Ok(Json(ItemsResponse {
        items: items.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{TestServices, make_item};

    use super::*;

    #[tokio::test]
    async fn test_index_returns_200() -> TestResult {
        let mut services = TestServices::new();

        services
            .catalog
            .expect_list_items()
            .once()
            .return_once(|| Ok(vec![make_item(1_00, 1), make_item(2_00, 0)]));

        let mut res = TestClient::get("http://example.com/items")
            .send(&services.unauthenticated_service(Router::with_path("items").get(handler)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: ItemsResponse = res.take_json().await?;
        let prices: Vec<u64> = body.items.iter().map(|item| item.price).collect();

        assert_eq!(prices, vec![1_00, 2_00]);

        Ok(())
    }
}
