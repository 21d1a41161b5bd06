//! Figure manifest built from detected figure regions

use crate::source::{BoundingBox, FigureRegion};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FigureKind {
    Plot,
    Micrograph,
    Schematic,
    Other,
}

static KIND_RULES: LazyLock<Vec<(FigureKind, Regex)>> = LazyLock::new(|| {
    [
        (FigureKind::Micrograph, r"(?i)\b(?:SEM|TEM|AFM|micrograph|microscopy|morpholog)"),
        (FigureKind::Schematic, r"(?i)\b(?:schematic|illustration|scheme|diagram of|structure of)"),
        (
            FigureKind::Plot,
            r"(?i)\b(?:plot|curves?|spectr|nyquist|arrhenius|isotherm|DSC|TGA|XRD|FTIR|versus|vs\.|as a function of|dependence)",
        ),
    ]
    .into_iter()
    .map(|(kind, p)| (kind, Regex::new(p).expect("invalid figure kind pattern")))
    .collect()
});

impl FigureKind {
    /// Kind from caption keywords; micrograph and schematic cues win over plot cues.
    pub fn from_caption(caption: &str) -> Self {
        KIND_RULES
            .iter()
            .find(|(_, re)| re.is_match(caption))
            .map(|(kind, _)| *kind)
            .unwrap_or(FigureKind::Other)
    }
}

/// One figure image linked to its caption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureImage {
    pub figure_id: String,
    pub page: u32,
    pub kind: FigureKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FigureManifest {
    pub images: Vec<FigureImage>,
}

impl FigureManifest {
    pub fn from_regions(regions: &[FigureRegion]) -> Self {
        let images = regions
            .iter()
            .map(|f| FigureImage {
                figure_id: f.figure_id.clone(),
                page: f.page,
                kind: f
                    .caption
                    .as_deref()
                    .map(FigureKind::from_caption)
                    .unwrap_or(FigureKind::Other),
                caption: f.caption.clone(),
                image_path: f.image_path.clone(),
                bbox: f.bbox,
            })
            .collect();
        Self { images }
    }
}
