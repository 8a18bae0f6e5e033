//! Shapes filtered datasets and change series into the structures the
//! client-side map and chart libraries consume.

use accident_map_analytics_models::PercentChangeSeries;
use accident_map_dataset::{Dataset, parsing::FORM_DATE_FORMAT};
use accident_map_server_models::{ChartSeries, LatLon, MapPoint, MapView};

use crate::config::MapDefaults;

/// One marker per record, labelled with its ISO date.
#[must_use]
pub fn to_map_points(dataset: &Dataset) -> Vec<MapPoint> {
    dataset
        .iter()
        .map(|record| MapPoint {
            lat: record.latitude,
            lon: record.longitude,
            label: record.date.format(FORM_DATE_FORMAT).to_string(),
        })
        .collect()
}

/// One chart line per category.
#[must_use]
pub fn to_chart_series(series: &PercentChangeSeries) -> Vec<ChartSeries> {
    series
        .categories
        .iter()
        .map(|row| ChartSeries {
            category: row.category,
            points: row
                .changes
                .iter()
                .map(|c| (c.year, c.percent_change))
                .collect(),
        })
        .collect()
}

/// Mean coordinate of the dataset, or `None` when it is empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_center(dataset: &Dataset) -> Option<LatLon> {
    if dataset.is_empty() {
        return None;
    }

    let n = dataset.len() as f64;
    let (lat_sum, lon_sum) = dataset
        .iter()
        .fold((0.0, 0.0), |(lat, lon), r| (lat + r.latitude, lon + r.longitude));

    Some(LatLon {
        lat: lat_sum / n,
        lon: lon_sum / n,
    })
}

/// Builds the full map view, centering on the data when there is any.
#[must_use]
pub fn map_view(dataset: &Dataset, defaults: &MapDefaults) -> MapView {
    MapView {
        center: mean_center(dataset).unwrap_or(defaults.center),
        zoom: defaults.zoom,
        points: to_map_points(dataset),
    }
}
