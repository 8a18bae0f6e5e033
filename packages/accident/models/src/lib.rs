#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident record and road layout taxonomy types.
//!
//! This crate defines the record shape shared by the dataset loader, the
//! filter engine and the server, plus the closed set of road layout
//! (`tracado_via`) labels used by the yearly reference table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Road geometry at the accident site (`tracado_via`).
///
/// Variants are declared in the order the reference table lists them, so
/// the derived [`Ord`] doubles as the chart's row order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
pub enum LayoutCategory {
    /// Straight road
    #[serde(rename = "Reta")]
    #[strum(to_string = "Reta")]
    Reta,
    /// Curve
    #[serde(rename = "Curva")]
    #[strum(to_string = "Curva")]
    Curva,
    /// Layout not reported
    #[serde(rename = "Não Informado")]
    #[strum(to_string = "Não Informado")]
    NaoInformado,
    /// Roundabout
    #[serde(rename = "Rotatória")]
    #[strum(to_string = "Rotatória")]
    Rotatoria,
    /// Temporary detour
    #[serde(rename = "Desvio Temporário")]
    #[strum(to_string = "Desvio Temporário")]
    DesvioTemporario,
    /// Road intersection
    #[serde(rename = "Interseção de vias")]
    #[strum(to_string = "Interseção de vias")]
    IntersecaoDeVias,
    /// Regulated U-turn
    #[serde(rename = "Retorno Regulamentado")]
    #[strum(to_string = "Retorno Regulamentado")]
    RetornoRegulamentado,
    /// Overpass
    #[serde(rename = "Viaduto")]
    #[strum(to_string = "Viaduto")]
    Viaduto,
    /// Bridge
    #[serde(rename = "Ponte")]
    #[strum(to_string = "Ponte")]
    Ponte,
    /// Tunnel
    #[serde(rename = "Túnel")]
    #[strum(to_string = "Túnel")]
    Tunel,
}

impl LayoutCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Reta,
            Self::Curva,
            Self::NaoInformado,
            Self::Rotatoria,
            Self::DesvioTemporario,
            Self::IntersecaoDeVias,
            Self::RetornoRegulamentado,
            Self::Viaduto,
            Self::Ponte,
            Self::Tunel,
        ]
    }
}

/// A single accident as loaded from the dataset CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct AccidentRecord {
    /// Calendar date of the accident.
    pub date: NaiveDate,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Federal highway number (`br`). `None` when the source cell is blank.
    pub road_id: Option<f64>,
    /// Raw road layout label (`tracado_via`), empty when not present.
    pub layout: String,
}

impl AccidentRecord {
    /// Parses [`Self::layout`] into a known [`LayoutCategory`].
    #[must_use]
    pub fn layout_category(&self) -> Option<LayoutCategory> {
        self.layout.trim().parse().ok()
    }
}
