//! HTTP handler functions for the accident map.

use accident_map_analytics::percent_change as compute_percent_change;
use accident_map_dataset::{Dataset, FilterCriteria, apply as apply_filter};
use accident_map_server_models::{ApiError, ApiHealth, FilterForm};
use actix_files::NamedFile;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};

use crate::{AppState, ServerError, render, view};

/// `GET /`
///
/// Renders the map with every accident in the dataset.
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    let form = FilterForm::default();
    html_response(map_page(&state, &form).await)
}

/// `POST /filter`
///
/// Renders the map narrowed to the submitted date range and road.
pub async fn filter(state: web::Data<AppState>, form: web::Form<FilterForm>) -> HttpResponse {
    let form = form.into_inner();
    html_response(map_page(&state, &form).await)
}

/// `GET /grafico`
///
/// Renders the year-over-year change chart of the reference table.
pub async fn grafico(state: web::Data<AppState>) -> HttpResponse {
    let series = view::to_chart_series(&compute_percent_change(&state.reference));
    html_response(render::chart_page(&series).map_err(ServerError::from))
}

/// `GET /home`
///
/// Serves the static landing page.
pub async fn home(state: web::Data<AppState>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open_async(state.static_dir.join("home.html")).await?)
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/points`
///
/// Returns the filtered map view as JSON. Accepts the same fields as the
/// filter form in the query string.
pub async fn points(state: web::Data<AppState>, query: web::Query<FilterForm>) -> HttpResponse {
    match load_filtered(&state, &query).await {
        Ok(dataset) => HttpResponse::Ok().json(view::map_view(&dataset, &state.map)),
        Err(e) => {
            log_error(&e);
            HttpResponse::build(e.status()).json(ApiError {
                error: e.public_message(),
            })
        }
    }
}

/// `GET /api/percent-change`
///
/// Returns the reference table's change series as JSON.
pub async fn percent_change(state: web::Data<AppState>) -> HttpResponse {
    let series = compute_percent_change(&state.reference);
    HttpResponse::Ok().json(view::to_chart_series(&series))
}

/// Parses the filter, loads the dataset off the async workers and narrows
/// it.
///
/// The filter is validated before touching the dataset, so malformed input
/// is rejected even when the data is unavailable.
async fn load_filtered(state: &AppState, form: &FilterForm) -> Result<Dataset, ServerError> {
    let criteria = FilterCriteria::parse(
        form.start_date.as_deref(),
        form.end_date.as_deref(),
        form.br_filter.as_deref(),
    )?;

    let path = state.dataset_path.clone();
    let dataset = web::block(move || Dataset::load(&path))
        .await
        .map_err(|_| ServerError::Cancelled)??;

    Ok(apply_filter(dataset, &criteria))
}

async fn map_page(state: &AppState, form: &FilterForm) -> Result<String, ServerError> {
    let dataset = load_filtered(state, form).await?;
    let view = view::map_view(&dataset, &state.map);
    Ok(render::index_page(&view, form)?)
}

fn html_response(page: Result<String, ServerError>) -> HttpResponse {
    match page {
        Ok(body) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(body),
        Err(e) => {
            log_error(&e);
            let status = e.status();
            HttpResponse::build(status)
                .content_type(ContentType::html())
                .body(render::error_page(status.as_u16(), &e.public_message()))
        }
    }
}

fn log_error(e: &ServerError) {
    if e.status().is_client_error() {
        log::warn!("Rejected request: {e}");
    } else {
        log::error!("Request failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use accident_map_analytics::reference::reference_table;
    use accident_map_server_models::{ChartSeries, MapView};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};

    use super::*;
    use crate::config::{MapDefaults, default_static_dir};
    use crate::configure;

    const SAMPLE: &str = "\
date,latitude,longitude,br,tracado_via
2020-01-01,-15.70,-47.90,101.0,Reta
2020-06-01,-15.80,-47.80,40.0,Curva
2021-01-01,-16.00,-48.00,101.0,Reta
";

    struct TempCsv(PathBuf);

    impl TempCsv {
        fn new(contents: &str) -> Self {
            let path =
                std::env::temp_dir().join(format!("accident_map_{}.csv", uuid::Uuid::new_v4()));
            std::fs::write(&path, contents).unwrap();
            Self(path)
        }
    }

    impl Drop for TempCsv {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn state(dataset_path: &Path) -> web::Data<AppState> {
        web::Data::new(AppState {
            dataset_path: dataset_path.to_path_buf(),
            reference: Arc::new(reference_table().unwrap()),
            map: MapDefaults::default(),
            static_dir: default_static_dir(),
        })
    }

    async fn body_text<B: actix_web::body::MessageBody>(
        resp: actix_web::dev::ServiceResponse<B>,
    ) -> String {
        let body = test::read_body(resp).await;
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[actix_web::test]
    async fn index_renders_every_record() {
        let csv = TempCsv::new(SAMPLE);
        let app = test::init_service(App::new().app_data(state(&csv.0)).configure(configure)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let html = body_text(resp).await;
        assert!(html.contains("3 acidentes"));
        assert!(html.contains(r#""label":"2020-01-01""#));
        assert!(html.contains(r#""label":"2021-01-01""#));
    }

    #[actix_web::test]
    async fn filter_narrows_by_date_range() {
        let csv = TempCsv::new(SAMPLE);
        let app = test::init_service(App::new().app_data(state(&csv.0)).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/filter")
            .set_form(vec![
                ("start_date", "2020-01-01"),
                ("end_date", "2020-12-31"),
                ("br_filter", ""),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let html = body_text(resp).await;
        assert!(html.contains("2 acidentes"));
        assert!(!html.contains(r#""label":"2021-01-01""#));
        assert!(html.contains(r#"value="2020-12-31""#));
    }

    #[actix_web::test]
    async fn filter_rejects_non_numeric_road() {
        let csv = TempCsv::new(SAMPLE);
        let app = test::init_service(App::new().app_data(state(&csv.0)).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/filter")
            .set_form(vec![("br_filter", "not-a-number")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(resp).await.contains("not-a-number"));
    }

    #[actix_web::test]
    async fn bad_filter_is_rejected_before_loading() {
        let app = test::init_service(
            App::new()
                .app_data(state(Path::new("/nonexistent/accidents.csv")))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/filter")
            .set_form(vec![("start_date", "01/01/2020"), ("end_date", "2020-12-31")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn missing_dataset_is_server_error() {
        let app = test::init_service(
            App::new()
                .app_data(state(Path::new("/nonexistent/accidents.csv")))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = body_text(resp).await;
        assert!(!html.contains("/nonexistent"));
    }

    #[actix_web::test]
    async fn api_points_applies_road_filter() {
        let csv = TempCsv::new(SAMPLE);
        let app = test::init_service(App::new().app_data(state(&csv.0)).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/api/points?br_filter=101")
            .to_request();
        let view: MapView = test::call_and_read_body_json(&app, req).await;

        let labels: Vec<&str> = view.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["2020-01-01", "2021-01-01"]);
        assert!((view.center.lat - -15.85).abs() < 1e-9);
    }

    #[actix_web::test]
    async fn empty_result_centers_on_default() {
        let csv = TempCsv::new(SAMPLE);
        let app = test::init_service(App::new().app_data(state(&csv.0)).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/api/points?start_date=2021-01-01&end_date=2020-01-01")
            .to_request();
        let view: MapView = test::call_and_read_body_json(&app, req).await;

        assert!(view.points.is_empty());
        assert_eq!(view.center, MapDefaults::default().center);
    }

    #[actix_web::test]
    async fn grafico_charts_every_reference_category() {
        let csv = TempCsv::new(SAMPLE);
        let app = test::init_service(App::new().app_data(state(&csv.0)).configure(configure)).await;

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/grafico").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let html = body_text(resp).await;
        for category in accident_map_accident_models::LayoutCategory::all() {
            assert!(
                html.contains(&format!(r#""name":"{category}""#)),
                "{category} missing from chart"
            );
        }
        assert!(html.contains("null"));
    }

    #[actix_web::test]
    async fn api_percent_change_matches_reference() {
        let csv = TempCsv::new(SAMPLE);
        let app = test::init_service(App::new().app_data(state(&csv.0)).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/api/percent-change")
            .to_request();
        let series: Vec<ChartSeries> = test::call_and_read_body_json(&app, req).await;

        let reta = &series[0];
        assert_eq!(reta.category.to_string(), "Reta");
        assert_eq!(reta.points[0], (2017, None));
        let (year, change) = reta.points[1];
        assert_eq!(year, 2018);
        assert!((change.unwrap() - -26.582_278).abs() < 1e-5);
    }

    #[actix_web::test]
    async fn home_serves_landing_page() {
        let csv = TempCsv::new(SAMPLE);
        let app = test::init_service(App::new().app_data(state(&csv.0)).configure(configure)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/home").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("/grafico"));
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = test::init_service(
            App::new()
                .app_data(state(Path::new("/unused.csv")))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
