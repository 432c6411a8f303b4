use std::str::FromStr;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    auth,
    pages::build_page,
    procedures::{self, ProcedureError},
    storage::Storage,
    types::{Locale, Page},
};

use super::{
    models::{ErrorResponse, HealthResponse, TrpcFailure, TrpcResult, TrpcSuccess},
    AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct TrpcQuery {
    input: Option<String>,
}

pub async fn health<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            uptime_secs,
        }),
    )
}

pub async fn trpc_query<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(procedure): Path<String>,
    Query(query): Query<TrpcQuery>,
) -> Response {
    let result = parse_input(query.input.as_deref().map(str::as_bytes))
        .and_then(|input| procedures::call_query(&state.storage, &procedure, input));
    envelope(result)
}

pub async fn trpc_mutation<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(procedure): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(auth::bearer_token);

    let caller = match auth::authenticate(&state.storage, token) {
        Ok(caller) => caller,
        Err(err) => {
            log::error!("Failed to resolve caller for {}: {:#}", procedure, err);
            return envelope(Err(ProcedureError::Internal(err)));
        }
    };

    if let Err(err) = procedures::check_mutation(caller.as_ref(), &procedure) {
        return envelope(Err(err));
    }

    let result = parse_input(Some(body.as_ref())).and_then(|input| {
        procedures::call_mutation(&state.storage, caller.as_ref(), &procedure, input)
    });
    envelope(result)
}

pub async fn trpc_method_not_supported(method: Method) -> Response {
    envelope(Err(ProcedureError::HttpMethodNotSupported(method.to_string())))
}

pub async fn overview_page<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(locale): Path<String>,
) -> Response {
    render_page(&state, &locale, "overview")
}

pub async fn profile_page<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path((locale, page)): Path<(String, String)>,
) -> Response {
    render_page(&state, &locale, &page)
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "endpoint not found".to_string(),
        }),
    )
}

fn render_page<S: Storage>(state: &AppState<S>, locale: &str, page: &str) -> Response {
    let (locale, page) = match (Locale::from_str(locale), Page::from_str(page)) {
        (Ok(locale), Ok(page)) => (locale, page),
        (Err(err), _) | (_, Err(err)) => {
            log::debug!("Rejected profile request: {}", err);
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    message: err.to_string(),
                }),
            )
                .into_response();
        }
    };
    Json(build_page(&state.storage, &state.site, locale, page)).into_response()
}

/// Empty input is treated as absent.
fn parse_input(raw: Option<&[u8]>) -> Result<Option<Value>, ProcedureError> {
    match raw {
        None => Ok(None),
        Some(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(None),
        Some(bytes) => serde_json::from_slice(bytes)
            .map(Some)
            .map_err(|err| ProcedureError::BadInput(format!("input is not valid JSON: {}", err))),
    }
}

fn envelope(result: Result<Value, ProcedureError>) -> Response {
    match result {
        Ok(data) => Json(TrpcSuccess {
            result: TrpcResult { data },
        })
        .into_response(),
        Err(err) => {
            let status = StatusCode::from_u16(err.code().http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(TrpcFailure::from(&err))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, Router};
    use http_body_util::BodyExt;
    use std::{sync::Arc, time::SystemTime};
    use tower::ServiceExt;
    use url::Url;

    use crate::{
        rest::router,
        seo::Site,
        storage::{SqliteStorage, StorageTx, StorageWrite, User, WardDemographic},
        types::{Role, WardNumber},
    };

    const ADMIN_TOKEN: &str = "admin-token";
    const VIEWER_TOKEN: &str = "viewer-token";

    fn app() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::new(dir.path().join("profile.sqlite"));
        storage.init().unwrap();

        let tx = storage.begin_tx().unwrap();
        for (token, name, role) in [
            (ADMIN_TOKEN, "ram", Role::Admin),
            (VIEWER_TOKEN, "sita", Role::Viewer),
        ] {
            tx.save_user(
                &auth::hash_token(token),
                &User {
                    name: name.to_string(),
                    role,
                },
            )
            .unwrap();
        }
        tx.upsert_ward_demographic(&WardDemographic {
            ward: WardNumber::new(1).unwrap(),
            total_population: 1200,
            male: 590,
            female: 610,
            other: 0,
            households: 260,
            area_sq_km: 14.5,
        })
        .unwrap();
        tx.commit().unwrap();

        let site = Site {
            name_en: "Khajura Rural Municipality".to_string(),
            name_ne: "खजुरा गाउँपालिका".to_string(),
            base_url: Url::parse("https://profile.example.gov.np/").unwrap(),
        };
        let router = router(AppState {
            storage,
            started_at: SystemTime::now(),
            site: Arc::new(site),
        });
        (dir, router)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .method("GET")
            .body(Body::empty())
            .unwrap()
    }

    fn post(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .uri(uri)
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (_dir, router) = app();
        let (status, body) = send(&router, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn query_wraps_data_in_result_envelope() {
        let (_dir, router) = app();
        let (status, body) = send(&router, get("/trpc/demographics.getAll")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["data"][0]["ward"], 1);
        assert_eq!(body["result"]["data"][0]["totalPopulation"], 1200);
    }

    #[tokio::test]
    async fn query_input_is_read_from_the_query_string() {
        let (_dir, router) = app();
        // {"ward":2}
        let (status, body) =
            send(&router, get("/trpc/demographics.getAll?input=%7B%22ward%22%3A2%7D")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["data"], Value::Array(Vec::new()));
    }

    #[tokio::test]
    async fn invalid_input_is_a_bad_request() {
        let (_dir, router) = app();
        // {"ward":99}
        let (status, body) =
            send(&router, get("/trpc/demographics.getAll?input=%7B%22ward%22%3A99%7D")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
        assert_eq!(body["error"]["httpStatus"], 400);

        let (status, _) = send(&router, get("/trpc/demographics.getAll?input=%7Bnope")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_procedure_is_not_found() {
        let (_dir, router) = app();
        let (status, body) = send(&router, get("/trpc/weather.today")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn mutations_cannot_be_called_with_get() {
        let (_dir, router) = app();
        let (status, body) = send(&router, get("/trpc/demographics.delete")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"]["code"], "METHOD_NOT_SUPPORTED");
    }

    #[tokio::test]
    async fn mutation_requires_a_known_token() {
        let (_dir, router) = app();
        let body = r#"{"ward":1}"#;

        let (status, payload) =
            send(&router, post("/trpc/demographics.delete", None, body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(payload["error"]["code"], "UNAUTHORIZED");

        let (status, _) = send(
            &router,
            post("/trpc/demographics.delete", Some("stolen"), body),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn authorization_runs_before_input_is_decoded() {
        let (_dir, router) = app();
        let (status, payload) =
            send(&router, post("/trpc/wardStats.create", None, "{not json")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(payload["error"]["code"], "UNAUTHORIZED");

        let (status, _) = send(
            &router,
            post("/trpc/wardStats.create", Some(VIEWER_TOKEN), "{not json"),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &router,
            post("/trpc/wardStats.create", Some(ADMIN_TOKEN), "{not json"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn other_http_methods_get_an_error_envelope() {
        let (_dir, router) = app();
        let request = Request::builder()
            .uri("/trpc/wardStats.create")
            .method("PUT")
            .body(Body::empty())
            .unwrap();
        let (status, payload) = send(&router, request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(payload["error"]["code"], "METHOD_NOT_SUPPORTED");
        assert_eq!(payload["error"]["httpStatus"], 405);
    }

    #[tokio::test]
    async fn viewer_role_is_forbidden_from_mutating() {
        let (_dir, router) = app();
        let (status, payload) = send(
            &router,
            post("/trpc/demographics.delete", Some(VIEWER_TOKEN), r#"{"ward":1}"#),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(payload["error"]["code"], "FORBIDDEN");

        let (_, after) = send(&router, get("/trpc/demographics.getAll")).await;
        assert_eq!(after["result"]["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn admin_can_create_and_read_back_ward_stats() {
        let (_dir, router) = app();
        let (status, created) = send(
            &router,
            post(
                "/trpc/wardStats.create",
                Some(ADMIN_TOKEN),
                r#"{"ward":1,"category":"religion","label":"Hindu","count":900}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["result"]["data"]["label"], "Hindu");

        // {"category":"religion"}
        let (status, listed) = send(
            &router,
            get("/trpc/wardStats.getAll?input=%7B%22category%22%3A%22religion%22%7D"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed["result"]["data"][0]["count"], 900);
    }

    #[tokio::test]
    async fn deleting_a_missing_ward_is_not_found() {
        let (_dir, router) = app();
        let (status, payload) = send(
            &router,
            post("/trpc/demographics.delete", Some(ADMIN_TOKEN), r#"{"ward":9}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(payload["error"]["httpStatus"], 404);
    }

    #[tokio::test]
    async fn profile_pages_are_served_per_locale() {
        let (_dir, router) = app();

        let (status, page) = send(&router, get("/profile/en/population")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["page"], "population");
        assert_eq!(
            page["metadata"]["canonical"],
            "https://profile.example.gov.np/profile/en/population"
        );

        let (status, overview) = send(&router, get("/profile/ne")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!overview["links"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_locale_or_page_is_not_found() {
        let (_dir, router) = app();
        let (status, _) = send(&router, get("/profile/fr/population")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&router, get("/profile/en/weather")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_routes_fall_back_to_json_404() {
        let (_dir, router) = app();
        let (status, body) = send(&router, get("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "endpoint not found");
    }
}
