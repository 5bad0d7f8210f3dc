use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::graph::BlendMethod;
use crate::validation::{ValidationCategory, ValidationItem, ValidationSeverity};

/// Viewport display blend mode for alpha-blended materials. Additive and
/// subtractive materials always end up on `Blend` regardless of this choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportAlphaMode {
    Opaque,
    Clip,
    Hashed,
    Blend,
}

impl ViewportAlphaMode {
    pub fn blend_method(self) -> BlendMethod {
        match self {
            ViewportAlphaMode::Opaque => BlendMethod::Opaque,
            ViewportAlphaMode::Clip => BlendMethod::Clip,
            ViewportAlphaMode::Hashed => BlendMethod::Hashed,
            ViewportAlphaMode::Blend => BlendMethod::Blend,
        }
    }
}

impl FromStr for ViewportAlphaMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opaque" => Ok(Self::Opaque),
            "clip" => Ok(Self::Clip),
            "hashed" => Ok(Self::Hashed),
            "blend" => Ok(Self::Blend),
            other => Err(format!(
                "unknown viewport alpha mode '{}', expected opaque|clip|hashed|blend",
                other
            )),
        }
    }
}

/// Which material setup to author.
///
/// The extracted worlds were lit entirely by baked vertex colours, so
/// `UnlitVertexColor` reproduces the original look; the other modes exist for
/// relighting workflows. Subtractive compositing only works in the unlit
/// modes and degrades to additive in the lit ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialMode {
    UnlitVertexColor,
    Unlit,
    LitVertexColor,
    Lit,
}

impl MaterialMode {
    /// Emission response rather than a diffuse BSDF.
    pub fn unlit(self) -> bool {
        matches!(self, MaterialMode::UnlitVertexColor | MaterialMode::Unlit)
    }

    /// Multiply sampled colour/alpha by the baked vertex-colour data.
    pub fn uses_vertex_color(self) -> bool {
        matches!(
            self,
            MaterialMode::UnlitVertexColor | MaterialMode::LitVertexColor
        )
    }
}

impl FromStr for MaterialMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(Self::UnlitVertexColor),
            "unlit" => Ok(Self::Unlit),
            "lit" => Ok(Self::LitVertexColor),
            "lit-no-vcol" => Ok(Self::Lit),
            other => Err(format!(
                "unknown material mode '{}', expected original|unlit|lit|lit-no-vcol",
                other
            )),
        }
    }
}

/// When to classify an opaque-flagged material as a cutout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutoutMode {
    Always,
    Detect,
    Never,
}

impl FromStr for CutoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(Self::Always),
            "detect" => Ok(Self::Detect),
            "never" => Ok(Self::Never),
            other => Err(format!(
                "unknown cutout mode '{}', expected always|detect|never",
                other
            )),
        }
    }
}

/// User-facing import options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOptions {
    pub viewport_alpha_mode: ViewportAlphaMode,
    pub material_mode: MaterialMode,
    /// Emission strength for unlit materials, in `[0, 2]`.
    pub unlit_emission_strength: f32,
    pub cutout_mode: CutoutMode,
    /// Distance transparent geometry is pushed along its normals to avoid
    /// z-fighting with coplanar opaque geometry, in `[0, 1]`.
    pub transparent_nudge: f32,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            viewport_alpha_mode: ViewportAlphaMode::Blend,
            material_mode: MaterialMode::UnlitVertexColor,
            unlit_emission_strength: 1.0,
            cutout_mode: CutoutMode::Always,
            transparent_nudge: 0.1,
        }
    }
}

impl ImportOptions {
    /// Bounds-check the numeric options.
    pub fn validate(&self) -> Vec<ValidationItem> {
        let mut items = vec![];
        if !(0.0..=2.0).contains(&self.unlit_emission_strength) {
            items.push(ValidationItem {
                code: "EMISSION_STRENGTH_OUT_OF_RANGE".to_string(),
                message: format!(
                    "Unlit emission strength {} is outside [0, 2]",
                    self.unlit_emission_strength
                ),
                severity: ValidationSeverity::Error,
                category: ValidationCategory::Options,
                line: None,
            });
        }
        if !(0.0..=1.0).contains(&self.transparent_nudge) {
            items.push(ValidationItem {
                code: "NUDGE_OUT_OF_RANGE".to_string(),
                message: format!(
                    "Transparent nudge {} is outside [0, 1]",
                    self.transparent_nudge
                ),
                severity: ValidationSeverity::Error,
                category: ValidationCategory::Options,
                line: None,
            });
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_in_range() {
        assert!(ImportOptions::default().validate().is_empty());
    }

    #[test]
    fn out_of_range_options_are_rejected() {
        let options = ImportOptions {
            unlit_emission_strength: 2.5,
            transparent_nudge: -0.1,
            ..Default::default()
        };
        let items = options.validate();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.severity == ValidationSeverity::Error));
    }

    #[test]
    fn mode_helpers() {
        assert!(MaterialMode::UnlitVertexColor.unlit());
        assert!(MaterialMode::UnlitVertexColor.uses_vertex_color());
        assert!(MaterialMode::Unlit.unlit());
        assert!(!MaterialMode::Unlit.uses_vertex_color());
        assert!(!MaterialMode::LitVertexColor.unlit());
        assert!(MaterialMode::LitVertexColor.uses_vertex_color());
        assert!(!MaterialMode::Lit.uses_vertex_color());
    }

    #[test]
    fn enum_tokens_parse() {
        assert_eq!(
            "original".parse::<MaterialMode>().unwrap(),
            MaterialMode::UnlitVertexColor
        );
        assert_eq!("detect".parse::<CutoutMode>().unwrap(), CutoutMode::Detect);
        assert_eq!(
            "hashed".parse::<ViewportAlphaMode>().unwrap(),
            ViewportAlphaMode::Hashed
        );
        assert!("region".parse::<CutoutMode>().is_err());
    }
}
