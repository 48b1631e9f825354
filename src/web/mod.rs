// Catalog web server
//
// Server-rendered pages per entity type. List views take the filter fields
// plus `pageNum` (1-based) and `pageSize` as query parameters; mutations are
// form posts answered with a 303 redirect to the list.

pub mod expenses;
pub mod html;
pub mod parks;
pub mod sites;

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::form::blank_as_none;
use crate::page::PageRequest;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub page_size: usize,
}

pub fn router(catalog: Arc<Catalog>, page_size: usize) -> Router {
    let state = AppState { catalog, page_size };

    Router::new()
        .route("/", get(sites::list))
        .route("/archaeological-sites", get(sites::list).post(sites::create))
        .route("/archaeological-sites/add", get(sites::add_form))
        .route("/archaeological-sites/edit/:id", get(sites::edit_form))
        .route("/archaeological-sites/:id", post(sites::update))
        .route("/archaeological-sites/delete/:id", post(sites::delete))
        .route("/archaeological-sites/close/:id", post(sites::close))
        .route("/national-parks", get(parks::list).post(parks::create))
        .route("/national-parks/add", get(parks::add_form))
        .route("/national-parks/edit/:id", get(parks::edit_form))
        .route("/national-parks/:id", post(parks::update))
        .route("/national-parks/delete/:id", post(parks::delete))
        .route("/national-parks/close/:id", post(parks::close))
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/expenses/add", get(expenses::add_form))
        .route("/expenses/edit/:id", get(expenses::edit_form))
        .route("/expenses/:id", post(expenses::update))
        .route("/expenses/delete/:id", post(expenses::delete))
        .route("/expenses/extend/:id", post(expenses::extend))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// List query
// ============================================================================

/// Entity filter fields plus paging parameters from the query string.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery<F> {
    #[serde(flatten)]
    pub filter: F,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub page_num: Option<usize>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub page_size: Option<usize>,
}

impl<F> ListQuery<F> {
    /// Zero-indexed request; page number defaults to 1, size to the configured one.
    pub fn request(&self, default_size: usize) -> Result<PageRequest, CatalogError> {
        PageRequest::from_one_based(
            self.page_num.unwrap_or(1),
            self.page_size.unwrap_or(default_size),
        )
    }
}

// ============================================================================
// Errors
// ============================================================================

pub struct WebError(CatalogError);

impl From<CatalogError> for WebError {
    fn from(err: CatalogError) -> Self {
        WebError(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, title) = match &self.0 {
            CatalogError::NotFound { .. } => (StatusCode::NOT_FOUND, "Not found"),
            CatalogError::InvalidPage { .. } | CatalogError::InvalidValue { .. } => {
                (StatusCode::BAD_REQUEST, "Bad request")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong"),
        };

        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        } else {
            warn!(error = %self.0, status = status.as_u16(), "request rejected");
        }

        (status, html::error_page(title, &self.0.to_string())).into_response()
    }
}

pub type WebResult<T> = Result<T, WebError>;

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::TextMatch;
    use crate::seed::seed_defaults;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn app() -> (Router, Arc<Catalog>) {
        let catalog = Arc::new(Catalog::in_memory(TextMatch::Sensitive));
        seed_defaults(&catalog).unwrap();
        (router(Arc::clone(&catalog), 10), catalog)
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_create_site_redirects_to_list() {
        let (app, catalog) = app();

        let response = app
            .oneshot(form_post(
                "/archaeological-sites",
                "name=Stobi&areaSize=12.5&rating=4.2&period=CLASSICAL&locationId=1",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/archaeological-sites");

        let site = catalog.sites.find_by_id(1).unwrap();
        assert_eq!(site.name, "Stobi");
        assert_eq!(site.location.name, "Skopje");
    }

    #[tokio::test]
    async fn test_list_applies_filters_and_blank_values() {
        let (app, catalog) = app();
        for (name, rating) in [("Stobi", 4.5), ("Heraclea", 3.0)] {
            catalog
                .sites
                .create(crate::entities::SiteDraft {
                    name: name.to_string(),
                    area_size: 10.0,
                    rating,
                    period: crate::entities::HistoricalPeriod::Classical,
                    location_id: 2,
                })
                .unwrap();
        }

        let response = app
            .clone()
            .oneshot(get("/archaeological-sites?name=&rating=4.0&period=&pageNum=1&pageSize=5"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Stobi"));
        assert!(!body.contains("Heraclea"));

        let root = app.oneshot(get("/")).await.unwrap();
        let body = body_text(root).await;
        assert!(body.contains("Stobi") && body.contains("Heraclea"));
    }

    #[tokio::test]
    async fn test_missing_record_is_404() {
        let (app, _) = app();
        let response = app.oneshot(get("/national-parks/edit/42")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_zero_page_size_is_400() {
        let (app, _) = app();
        let response = app.oneshot(get("/expenses?pageSize=0")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_finite_form_number_is_400() {
        let catalog = Arc::new(Catalog::sqlite(
            crate::db::open_in_memory().unwrap(),
            TextMatch::Sensitive,
        ));
        seed_defaults(&catalog).unwrap();
        let app = router(Arc::clone(&catalog), 10);

        let response = app
            .oneshot(form_post(
                "/archaeological-sites",
                "name=Stobi&areaSize=NaN&rating=4.2&period=CLASSICAL&locationId=1",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(catalog.sites.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_close_and_extend_transitions() {
        let (app, catalog) = app();
        catalog
            .parks
            .create(crate::entities::ParkDraft {
                name: "Pelister".to_string(),
                area_size: 171.0,
                rating: 4.8,
                park_type: crate::entities::ParkType::National,
                location_id: 3,
            })
            .unwrap();

        let response = app
            .clone()
            .oneshot(form_post("/national-parks/close/1", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(catalog.parks.find_by_id(1).unwrap().closed);

        let response = app
            .clone()
            .oneshot(form_post(
                "/expenses",
                "title=Flights&dateCreated=2025-03-01&amount=420.0&daysToExpire=30&expenseCategory=TRAVEL&vendor=2",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app.oneshot(form_post("/expenses/extend/1", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(catalog.expenses.find_by_id(1).unwrap().days_to_expire, 31);
    }

    #[tokio::test]
    async fn test_update_and_delete_site() {
        let (app, catalog) = app();
        catalog
            .sites
            .create(crate::entities::SiteDraft {
                name: "Stobi".to_string(),
                area_size: 10.0,
                rating: 4.0,
                period: crate::entities::HistoricalPeriod::Classical,
                location_id: 1,
            })
            .unwrap();

        let response = app
            .clone()
            .oneshot(form_post(
                "/archaeological-sites/1",
                "name=Stobi+Ruins&areaSize=11&rating=4.4&period=ROMAN&locationId=1",
            ))
            .await
            .unwrap();
        // unknown period value is rejected by the form extractor
        assert!(response.status().is_client_error());

        let response = app
            .clone()
            .oneshot(form_post(
                "/archaeological-sites/1",
                "name=Stobi+Ruins&areaSize=11&rating=4.4&period=CLASSICAL&locationId=2",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let site = catalog.sites.find_by_id(1).unwrap();
        assert_eq!(site.name, "Stobi Ruins");
        assert_eq!(site.location.id, Some(2));

        let response = app.oneshot(form_post("/archaeological-sites/delete/1", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(catalog.sites.find_by_id(1).unwrap_err().is_not_found());
    }
}
