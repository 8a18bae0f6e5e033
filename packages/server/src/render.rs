//! HTML pages for the map and chart views.
//!
//! Pages embed their data as JSON and leave drawing to Leaflet (with
//! `Leaflet.markercluster`) and Plotly, loaded from a CDN.

use accident_map_server_models::{ChartSeries, FilterForm, MapView};
use serde::Serialize;
use serde_json::json;

// TODO: pin `integrity` for the markercluster and Plotly tags from hashes of
// the published 1.5.3 and 2.35.2 files.
const LEAFLET_HEAD: &str = r#"<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" integrity="sha256-p4NxAoJBhIIN+hmNHrzRCf9tD/miZyoHS5obTRR9BMY=" crossorigin="anonymous">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css" crossorigin="anonymous">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css" crossorigin="anonymous">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js" integrity="sha256-20nQCchB9co0qIjJZRGuk2/Z9VM+kNiyxNV1lvTlZBo=" crossorigin="anonymous"></script>
<script src="https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js" crossorigin="anonymous"></script>"#;

const PLOTLY_HEAD: &str =
    r#"<script src="https://cdn.plot.ly/plotly-2.35.2.min.js" crossorigin="anonymous"></script>"#;

const NAV: &str = r#"<nav><a href="/home">Início</a> <a href="/">Mapa</a> <a href="/grafico">Gráfico</a></nav>"#;

/// Chart title.
pub const CHART_TITLE: &str = "Variação Percentual de Tracado Via (2017-2023)";

/// Escapes text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serializes `value` for embedding inside a `<script>` element.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if `value` cannot be serialized.
pub fn embed_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn page(title: &str, head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/static/style.css">
{head}
</head>
<body>
{NAV}
{body}
</body>
</html>
"#,
        title = escape_html(title),
    )
}

/// Renders the map page with the filter form pre-filled from `form`.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if the view cannot be serialized.
pub fn index_page(view: &MapView, form: &FilterForm) -> Result<String, serde_json::Error> {
    let field = |v: &Option<String>| escape_html(v.as_deref().unwrap_or_default());
    let start_date = field(&form.start_date);
    let end_date = field(&form.end_date);
    let br_filter = field(&form.br_filter);
    let count = view.points.len();
    let data = embed_json(view)?;

    let body = format!(
        r#"<form class="filter" method="post" action="/filter">
<label>Data inicial <input type="date" name="start_date" value="{start_date}"></label>
<label>Data final <input type="date" name="end_date" value="{end_date}"></label>
<label>BR <input type="text" name="br_filter" inputmode="decimal" value="{br_filter}"></label>
<button type="submit">Filtrar</button>
</form>
<p class="summary">{count} acidentes</p>
<div id="map"></div>
<script>
const view = {data};
const map = L.map('map').setView([view.center.lat, view.center.lon], view.zoom);
L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
  attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);
const cluster = L.markerClusterGroup();
for (const p of view.points) {{
  cluster.addLayer(L.marker([p.lat, p.lon]).bindPopup('Data: ' + p.label));
}}
map.addLayer(cluster);
</script>"#
    );

    Ok(page("Mapa de Acidentes", LEAFLET_HEAD, &body))
}

/// Builds the Plotly figure (`data` + `layout`) for the chart series.
#[must_use]
pub fn chart_figure(series: &[ChartSeries]) -> serde_json::Value {
    let traces: Vec<serde_json::Value> = series
        .iter()
        .map(|s| {
            let x: Vec<i32> = s.points.iter().map(|(year, _)| *year).collect();
            let y: Vec<Option<f64>> = s.points.iter().map(|(_, value)| *value).collect();
            json!({
                "type": "scatter",
                "mode": "lines+markers",
                "name": s.category.to_string(),
                "x": x,
                "y": y,
            })
        })
        .collect();

    json!({
        "data": traces,
        "layout": {
            "title": { "text": CHART_TITLE },
            "xaxis": { "title": { "text": "Ano" }, "dtick": 1 },
            "yaxis": { "title": { "text": "Variação Percentual (%)" } },
            "legend": { "title": { "text": "Tracado Via" } },
            "paper_bgcolor": "#111111",
            "plot_bgcolor": "#111111",
            "font": { "color": "#f2f5fa" },
        },
    })
}

/// Renders the percent-change chart page.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if the figure cannot be serialized.
pub fn chart_page(series: &[ChartSeries]) -> Result<String, serde_json::Error> {
    let figure = embed_json(&chart_figure(series))?;

    let body = format!(
        r#"<div id="chart"></div>
<script>
const figure = {figure};
Plotly.newPlot('chart', figure.data, figure.layout, {{ responsive: true }});
</script>"#
    );

    Ok(page(CHART_TITLE, PLOTLY_HEAD, &body))
}

/// Renders a user-facing error page.
#[must_use]
pub fn error_page(status: u16, message: &str) -> String {
    let body = format!(
        r#"<section class="error">
<h1>Erro {status}</h1>
<p>{message}</p>
<p><a href="/">Voltar ao mapa</a></p>
</section>"#,
        message = escape_html(message),
    );

    page("Erro", "", &body)
}

#[cfg(test)]
mod tests {
    use accident_map_accident_models::LayoutCategory;
    use accident_map_server_models::{LatLon, MapPoint};

    use super::*;

    fn view() -> MapView {
        MapView {
            center: LatLon {
                lat: -15.0,
                lon: -47.0,
            },
            zoom: 12,
            points: vec![MapPoint {
                lat: -15.0,
                lon: -47.0,
                label: "2020-06-01".to_string(),
            }],
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn embedded_json_cannot_close_script() {
        let json = embed_json(&"</script><script>alert(1)").unwrap();
        assert!(!json.contains("</script>"));
        assert!(json.contains("<\\/script>"));
    }

    #[test]
    fn index_page_embeds_points_and_form_values() {
        let form = FilterForm {
            start_date: Some("2020-01-01".to_string()),
            end_date: Some("2020-12-31".to_string()),
            br_filter: Some("\"><script>".to_string()),
        };
        let html = index_page(&view(), &form).unwrap();

        assert!(html.contains(r#"value="2020-01-01""#));
        assert!(html.contains(r#"value="2020-12-31""#));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
        assert!(html.contains(r#""label":"2020-06-01""#));
        assert!(html.contains("1 acidentes"));
        assert!(html.contains("{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"));
        assert!(html.contains("markerClusterGroup"));
    }

    #[test]
    fn cdn_tags_are_pinned_and_cross_origin() {
        let html = index_page(&view(), &FilterForm::default()).unwrap();
        assert!(html.contains(r#"leaflet@1.9.4/dist/leaflet.js" integrity="sha256-"#));
        assert!(html.contains(r#"leaflet@1.9.4/dist/leaflet.css" integrity="sha256-"#));

        let chart = chart_page(&[]).unwrap();
        for doc in [&html, &chart] {
            let cdn_tags = doc
                .split('<')
                .filter(|t| t.starts_with("script src=\"https://") || t.starts_with("link "))
                .filter(|t| t.contains("https://"));
            for tag in cdn_tags {
                assert!(tag.contains(r#"crossorigin="anonymous""#), "{tag}");
            }
        }
    }

    #[test]
    fn chart_figure_has_one_trace_per_category() {
        let series = vec![
            ChartSeries {
                category: LayoutCategory::Reta,
                points: vec![(2017, None), (2018, Some(-26.58))],
            },
            ChartSeries {
                category: LayoutCategory::Tunel,
                points: vec![(2017, None), (2018, Some(0.0))],
            },
        ];

        let figure = chart_figure(&series);
        let traces = figure["data"].as_array().unwrap();
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0]["name"], "Reta");
        assert_eq!(traces[0]["mode"], "lines+markers");
        assert_eq!(traces[0]["x"], json!([2017, 2018]));
        assert_eq!(traces[0]["y"], json!([null, -26.58]));
        assert_eq!(traces[1]["name"], "Túnel");
        assert_eq!(figure["layout"]["title"]["text"], CHART_TITLE);
    }

    #[test]
    fn chart_page_embeds_figure() {
        let html = chart_page(&[]).unwrap();
        assert!(html.contains("Plotly.newPlot"));
        assert!(html.contains(CHART_TITLE));
    }

    #[test]
    fn error_page_escapes_message() {
        let html = error_page(400, "bad <input>");
        assert!(html.contains("Erro 400"));
        assert!(html.contains("bad &lt;input&gt;"));
    }
}
