//! Texture-binding manifest parsing.
//!
//! One line per texture/mesh binding, fields split by `:` then `,`:
//!
//! ```text
//! {group},{mesh}:{texture_name}:{alpha_flags}:{priority}:{draw_priority}:{wrap_u}, {wrap_v}
//! ```
//!
//! Every line is checked eagerly and all findings are collected into a
//! [`ValidationReport`] so a malformed manifest is reported in full before
//! anything is mutated.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::validation::report::{
    ValidationCategory, ValidationItem, ValidationReport, ValidationSeverity,
};

/// Filename suffix the extraction pipeline gives texture manifests.
pub const MANIFEST_SUFFIX: &str = "-preSliced-texture-info.txt";

// ============================================================================
// Alpha flags
// ============================================================================

/// Alpha-flag bitmask carried by each manifest line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlphaFlags(pub u32);

impl AlphaFlags {
    pub const OPAQUE: u32 = 1;
    pub const ALPHA: u32 = 2;
    pub const ADDITIVE: u32 = 4;
    pub const SUBTRACTIVE: u32 = 8;

    /// Exactly the opaque bit, nothing else.
    pub fn opaque_only(self) -> bool {
        self.0 == Self::OPAQUE
    }

    pub fn alpha_blended(self) -> bool {
        self.0 & Self::ALPHA != 0
    }

    pub fn additive(self) -> bool {
        self.0 & Self::ADDITIVE != 0
    }

    pub fn subtractive(self) -> bool {
        self.0 & Self::SUBTRACTIVE != 0
    }
}

impl fmt::Display for AlphaFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Wrap modes
// ============================================================================

/// Per-axis UV wrap behavior. `Wrap` and `Repeat` tokens both mean repeat;
/// `Region*` tokens are unsupported and rejected during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapMode {
    Repeat,
    Clamp,
}

impl WrapMode {
    pub fn as_str(self) -> &'static str {
        match self {
            WrapMode::Repeat => "Repeat",
            WrapMode::Clamp => "Clamp",
        }
    }
}

impl fmt::Display for WrapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Bindings
// ============================================================================

/// One parsed manifest line: which mesh gets which texture, and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureBinding {
    /// Manifest line this binding came from (1-based), for diagnostics.
    pub source_line: u32,
    pub group_index: u32,
    pub mesh_index: u32,
    pub texture_name: String,
    pub alpha_flags: AlphaFlags,
    pub priority: i32,
    pub draw_priority: i32,
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
}

impl TextureBinding {
    /// Material name this binding produces, unique per (mesh, texture, state).
    pub fn material_name(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.group_index,
            self.mesh_index,
            self.texture_name,
            self.alpha_flags,
            self.wrap_u,
            self.wrap_v
        )
    }
}

// ============================================================================
// Path conventions
// ============================================================================

/// Derive the world id from a manifest path
/// (`xx00-preSliced-texture-info.txt` → `xx00`).
pub fn world_id_from_manifest(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    name.strip_suffix(MANIFEST_SUFFIX).map(|s| s.to_string())
}

/// Path of a referenced texture, co-located with the manifest.
pub fn texture_path(dir: &Path, texture_name: &str) -> PathBuf {
    dir.join(format!("{}.png", texture_name))
}

/// Candidate paths for the world mesh-hierarchy document, in preference order.
pub fn world_document_candidates(dir: &Path, world_id: &str) -> Vec<PathBuf> {
    vec![
        dir.join(format!("{}-world.glb", world_id)),
        dir.join(format!("{}-world.gltf", world_id)),
    ]
}

// ============================================================================
// Parsing
// ============================================================================

fn syntax_error(line_no: u32, message: String) -> ValidationItem {
    ValidationItem {
        code: "MANIFEST_SYNTAX".to_string(),
        message,
        severity: ValidationSeverity::Error,
        category: ValidationCategory::Manifest,
        line: Some(line_no),
    }
}

fn parse_wrap_token(token: &str, axis: char, line_no: u32) -> Result<WrapMode, ValidationItem> {
    if token.contains("Region") {
        return Err(ValidationItem {
            code: "REGION_WRAP_UNSUPPORTED".to_string(),
            message: format!("Line {}: Region wrap modes are not supported", line_no),
            severity: ValidationSeverity::Error,
            category: ValidationCategory::Manifest,
            line: Some(line_no),
        });
    }
    match token {
        "Wrap" | "Repeat" => Ok(WrapMode::Repeat),
        "Clamp" => Ok(WrapMode::Clamp),
        other => Err(syntax_error(
            line_no,
            format!("Line {}: unknown wrap {} token '{}'", line_no, axis, other),
        )),
    }
}

fn parse_line(line: &str, line_no: u32, report: &mut ValidationReport) -> Option<TextureBinding> {
    let fields: Vec<&str> = line.split(':').collect();
    if fields.len() != 6 {
        report.add(syntax_error(
            line_no,
            format!(
                "Line {}: expected 6 ':'-separated fields, found {}",
                line_no,
                fields.len()
            ),
        ));
        return None;
    }

    let mesh_info: Vec<&str> = fields[0].split(',').collect();
    if mesh_info.len() != 2 {
        report.add(syntax_error(
            line_no,
            format!("Line {}: expected 'group,mesh' in first field", line_no),
        ));
        return None;
    }

    let mut int_errors: Vec<ValidationItem> = vec![];
    let mut parse_int = |s: &str, what: &str| -> Option<i64> {
        match s.trim().parse::<i64>() {
            Ok(v) => Some(v),
            Err(_) => {
                int_errors.push(syntax_error(
                    line_no,
                    format!("Line {}: {} '{}' is not an integer", line_no, what, s.trim()),
                ));
                None
            }
        }
    };

    let group_index = parse_int(mesh_info[0], "group index");
    let mesh_index = parse_int(mesh_info[1], "mesh index");
    let alpha_flags = parse_int(fields[2], "alpha flags");
    let priority = parse_int(fields[3], "priority");
    let draw_priority = parse_int(fields[4], "draw priority");

    for item in int_errors.drain(..) {
        report.add(item);
    }
    let (group_index, mesh_index, alpha_flags, priority, draw_priority) = match (
        group_index,
        mesh_index,
        alpha_flags,
        priority,
        draw_priority,
    ) {
        (Some(g), Some(m), Some(a), Some(p), Some(d)) => (g, m, a, p, d),
        _ => return None,
    };

    let wrap_info: Vec<&str> = fields[5].split(',').collect();
    if wrap_info.len() != 2 {
        report.add(syntax_error(
            line_no,
            format!("Line {}: expected 'wrapU, wrapV' in last field", line_no),
        ));
        return None;
    }

    let wrap_u = parse_wrap_token(wrap_info[0].trim(), 'U', line_no);
    let wrap_v = parse_wrap_token(wrap_info[1].trim(), 'V', line_no);
    let (wrap_u, wrap_v) = match (wrap_u, wrap_v) {
        (Ok(u), Ok(v)) => (u, v),
        (u, v) => {
            if let Err(item) = u {
                report.add(item);
            }
            if let Err(item) = v {
                report.add(item);
            }
            return None;
        }
    };

    let binding = TextureBinding {
        source_line: line_no,
        group_index: group_index as u32,
        mesh_index: mesh_index as u32,
        texture_name: fields[1].trim().to_string(),
        alpha_flags: AlphaFlags(alpha_flags as u32),
        priority: priority as i32,
        draw_priority: draw_priority as i32,
        wrap_u,
        wrap_v,
    };

    check_alpha_flags(&binding, line_no, report);
    Some(binding)
}

/// Additive and subtractive are mutually exclusive compositing modes, and
/// neither means anything without the alpha bit.
fn check_alpha_flags(binding: &TextureBinding, line_no: u32, report: &mut ValidationReport) {
    let flags = binding.alpha_flags;
    if flags.additive() && flags.subtractive() {
        report.add(ValidationItem {
            code: "ALPHA_FLAGS_CONFLICT".to_string(),
            message: format!(
                "Line {}: texture '{}' is flagged both additive and subtractive",
                line_no, binding.texture_name
            ),
            severity: ValidationSeverity::Error,
            category: ValidationCategory::Manifest,
            line: Some(line_no),
        });
    } else if (flags.additive() || flags.subtractive()) && !flags.alpha_blended() {
        report.add(ValidationItem {
            code: "ALPHA_FLAGS_NO_ALPHA_BIT".to_string(),
            message: format!(
                "Line {}: texture '{}' has additive/subtractive flags without the alpha bit",
                line_no, binding.texture_name
            ),
            severity: ValidationSeverity::Warning,
            category: ValidationCategory::Manifest,
            line: Some(line_no),
        });
    }
}

/// Parse a full manifest. Returns every binding that parsed cleanly plus a
/// report covering all lines; callers must not act on the bindings when the
/// report carries errors.
pub fn parse_manifest(text: &str) -> (Vec<TextureBinding>, ValidationReport) {
    let mut bindings = vec![];
    let mut report = ValidationReport::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx as u32 + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(binding) = parse_line(line, line_no, &mut report) {
            bindings.push(binding);
        }
    }

    (bindings, report)
}
