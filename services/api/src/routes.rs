use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use cardio_predict::assessment::validation::validate_submission;
use cardio_predict::assessment::{
    assessment_router, AssessmentRecord, AssessmentRepository, AssessmentService,
    AssessmentServiceError, CsvPatientImporter,
};
use cardio_predict::error::AppError;
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct ImportRequest {
    pub(crate) csv: String,
}

pub(crate) fn with_assessment_routes<R>(service: Arc<AssessmentService<R>>) -> axum::Router
where
    R: AssessmentRepository + 'static,
{
    assessment_router(service.clone())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/assessments/import",
            axum::routing::post(import_endpoint::<R>),
        )
        .layer(Extension(service))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Stores every row of a CSV export, or none of them when any row is rejected.
pub(crate) async fn import_endpoint<R>(
    Extension(service): Extension<Arc<AssessmentService<R>>>,
    Json(payload): Json<ImportRequest>,
) -> Result<(StatusCode, Json<Vec<AssessmentRecord>>), AppError>
where
    R: AssessmentRepository + 'static,
{
    let submissions = CsvPatientImporter::from_reader(Cursor::new(payload.csv.into_bytes()))?;
    for submission in &submissions {
        validate_submission(submission).map_err(AssessmentServiceError::from)?;
    }

    let mut stored = Vec::with_capacity(submissions.len());
    for submission in submissions {
        stored.push(service.submit(submission)?);
    }

    info!(count = stored.len(), "patient export imported");
    Ok((StatusCode::CREATED, Json(stored)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryAssessmentRepository;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    const HEADER: &str = "name,age,gender,chest_pain_type,resting_bp,cholesterol,fasting_bs,resting_ecg,max_heart_rate,exercise_angina,oldpeak,st_slope,smoking,diabetes,family_history\n";

    fn build_service() -> (
        Arc<AssessmentService<InMemoryAssessmentRepository>>,
        Arc<InMemoryAssessmentRepository>,
    ) {
        let repository = Arc::new(InMemoryAssessmentRepository::default());
        let service = Arc::new(AssessmentService::new(repository.clone()));
        (service, repository)
    }

    fn app_state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        }
    }

    #[tokio::test]
    async fn import_endpoint_stores_every_row() {
        let (service, repository) = build_service();
        let request = ImportRequest {
            csv: format!(
                "{HEADER}Ada Lovelace,58,female,atypical,142,251,false,st-t-abnormality,150,false,1.4,flat,false,true,false\n\
                 Alan Turing,41,male,non-anginal,120,190,false,normal,175,false,0.0,up,true,false,true\n"
            ),
        };

        let (status, Json(stored)) = import_endpoint(Extension(service), Json(request))
            .await
            .expect("import succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].outcome.risk_score, 94);
        assert_eq!(repository.all().expect("list").len(), 2);
    }

    #[tokio::test]
    async fn import_endpoint_stores_nothing_when_a_row_is_invalid() {
        let (service, repository) = build_service();
        let request = ImportRequest {
            csv: format!(
                "{HEADER}Ada Lovelace,58,female,atypical,142,251,false,st-t-abnormality,150,false,1.4,flat,false,true,false\n\
                 Alan Turing,41,male,non-anginal,120,-5,false,normal,175,false,0.0,up,true,false,true\n"
            ),
        };

        let err = import_endpoint(Extension(service), Json(request))
            .await
            .expect_err("negative cholesterol rejected");

        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert!(repository.all().expect("list").is_empty());
    }

    #[tokio::test]
    async fn import_endpoint_rejects_unknown_labels_as_bad_request() {
        let (service, _) = build_service();
        let request = ImportRequest {
            csv: format!(
                "{HEADER}Ada Lovelace,58,unknown,atypical,142,251,false,normal,150,false,1.4,flat,false,true,false\n"
            ),
        };

        let err = import_endpoint(Extension(service), Json(request))
            .await
            .expect_err("unknown gender rejected");

        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_flag_flips() {
        let state = app_state(false);

        let response = readiness_endpoint(Extension(state.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_and_assessment_routes_share_one_router() {
        let (service, _) = build_service();
        let router = with_assessment_routes(service).layer(Extension(app_state(true)));

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/dashboard")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["total_patients"], 0);
    }
}
