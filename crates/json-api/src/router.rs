//! App Router

use salvo::Router;

use crate::{auth, carts, healthcheck, items, observability, orders};

/// Routes served by the API. State injection and request logging are added by the caller.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(
            Router::with_path("items")
                .get(items::index::handler)
                .push(Router::with_path("{item}").get(items::get::handler)),
        )
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(
                    Router::with_path("cart")
                        .get(carts::get::handler)
                        .delete(carts::delete::handler)
                        .push(
                            Router::with_path("items")
                                .post(carts::items::create::handler)
                                .push(
                                    Router::with_path("{item}")
                                        .put(carts::items::update::handler)
                                        .delete(carts::items::delete::handler),
                                ),
                        ),
                )
                .push(
                    Router::with_path("orders")
                        .post(orders::create::handler)
                        .push(Router::with_path("mine").get(orders::index::handler))
                        .push(Router::with_path("{order}").get(orders::get::handler)),
                ),
        )
}
