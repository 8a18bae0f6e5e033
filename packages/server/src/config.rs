//! Server configuration resolved from environment variables.
//!
//! | Variable          | Default                                          |
//! |-------------------|--------------------------------------------------|
//! | `BIND_ADDR`       | `127.0.0.1`                                      |
//! | `PORT`            | `8080`                                           |
//! | `ACCIDENTS_CSV`   | `data/accidents_2017_to_2023_portugues.csv`      |
//! | `REFERENCE_TABLE` | embedded table                                   |
//! | `STATIC_DIR`      | `packages/server/static`                         |
//! | `MAP_CENTER`      | `-15.7801,-47.9292` (Brasília)                   |
//! | `MAP_ZOOM`        | `12`                                             |

use std::path::{Path, PathBuf};

use accident_map_server_models::LatLon;

/// File name of the accident dataset inside `data/`.
pub const DATASET_FILENAME: &str = "accidents_2017_to_2023_portugues.csv";

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`; falls back to the
/// current directory if the manifest is not nested under `packages/`.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Returns the default dataset path under the workspace `data/` directory.
#[must_use]
pub fn default_dataset_path() -> PathBuf {
    project_root().join("data").join(DATASET_FILENAME)
}

/// Returns the directory holding the landing page and stylesheet.
#[must_use]
pub fn default_static_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("static")
}

/// Initial map position used when there is nothing to center on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapDefaults {
    /// Fallback center for an empty point set.
    pub center: LatLon,
    /// Initial zoom level.
    pub zoom: u8,
}

impl Default for MapDefaults {
    fn default() -> Self {
        Self {
            center: LatLon {
                lat: -15.7801,
                lon: -47.9292,
            },
            zoom: 12,
        }
    }
}

/// Everything needed to start the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: String,
    /// Port to listen on.
    pub port: u16,
    /// Accident CSV, read on every request.
    pub dataset_path: PathBuf,
    /// Optional replacement for the embedded reference table.
    pub reference_table: Option<PathBuf>,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Map defaults.
    pub map: MapDefaults,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            dataset_path: default_dataset_path(),
            reference_table: None,
            static_dir: default_static_dir(),
            map: MapDefaults::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Unset or blank variables keep their defaults. Malformed values are
    /// logged and ignored.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(bind_addr) = var("BIND_ADDR") {
            config.bind_addr = bind_addr;
        }

        if let Some(port) = var("PORT") {
            match port.trim().parse() {
                Ok(port) => config.port = port,
                Err(e) => log::warn!("Ignoring invalid PORT '{port}': {e}"),
            }
        }

        if let Some(path) = var("ACCIDENTS_CSV") {
            config.dataset_path = PathBuf::from(path);
        }

        config.reference_table = var("REFERENCE_TABLE").map(PathBuf::from);

        if let Some(dir) = var("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }

        if let Some(center) = var("MAP_CENTER") {
            match parse_center(&center) {
                Some(parsed) => config.map.center = parsed,
                None => log::warn!("Ignoring invalid MAP_CENTER '{center}': expected 'lat,lon'"),
            }
        }

        if let Some(zoom) = var("MAP_ZOOM") {
            match zoom.trim().parse() {
                Ok(zoom) => config.map.zoom = zoom,
                Err(e) => log::warn!("Ignoring invalid MAP_ZOOM '{zoom}': {e}"),
            }
        }

        config
    }
}

/// Parses a `"lat,lon"` pair.
fn parse_center(s: &str) -> Option<LatLon> {
    let (lat, lon) = s.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }
    Some(LatLon { lat, lon })
}
