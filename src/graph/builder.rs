//! Per-binding material synthesis.
//!
//! Compiles one manifest binding (alpha-flag bitmask, material mode and
//! wrap-mode pair) into a [`MaterialBlueprint`]: UV sampling path, optional
//! vertex-colour modulation, emissive or diffuse response, opacity
//! classification, and the transparency compositing subgraph.

use anyhow::{anyhow, bail, Result};

use super::{
    socket, BlendMethod, MaterialBlueprint, MathOp, ShaderGraph, ShaderNodeKind, TextureExtension,
};
use crate::import::options::{CutoutMode, ImportOptions};
use crate::manifest::{TextureBinding, WrapMode};
use crate::texture_pipeline::LoadedTexture;

/// Build the material blueprint for one binding.
///
/// `uv_sets` are the target mesh's UV set names in order; vertex-colour modes
/// need two (the second carries baked vertex alpha in its X coordinate).
pub fn build_material(
    binding: &TextureBinding,
    options: &ImportOptions,
    texture: &LoadedTexture,
    uv_sets: &[String],
) -> Result<MaterialBlueprint> {
    let mut graph = ShaderGraph::new();

    let uv_layer = uv_sets.first().ok_or_else(|| {
        anyhow!(
            "mesh bound to texture '{}' has no UV set",
            binding.texture_name
        )
    })?;
    let uv = graph.add(
        ShaderNodeKind::UvMap {
            layer: uv_layer.clone(),
        },
        Some("Main UV Map"),
        (0.0, 0.0),
    );

    // With matching wrap modes the image node's own extension covers both
    // axes. Mismatched modes clamp per axis between a split and a recombine,
    // with the image left repeating.
    let extension = if binding.wrap_u == binding.wrap_v {
        match binding.wrap_u {
            WrapMode::Repeat => TextureExtension::Repeat,
            WrapMode::Clamp => TextureExtension::Extend,
        }
    } else {
        TextureExtension::Repeat
    };

    let tex;
    if binding.wrap_u == binding.wrap_v {
        tex = graph.add(
            ShaderNodeKind::ImageTexture {
                image: texture.file_name.clone(),
                extension,
            },
            Some("Main Image Texture"),
            (200.0, 0.0),
        );
        graph.link(uv, 0, tex, 0);
    } else {
        let split = graph.add(ShaderNodeKind::SeparateXyz, Some("UV Split"), (200.0, 0.0));
        graph.link(uv, 0, split, 0);
        let combine = graph.add(ShaderNodeKind::CombineXyz, Some("UV Combine"), (600.0, 0.0));
        for (axis, wrap) in [(0u32, binding.wrap_u), (1u32, binding.wrap_v)] {
            match wrap {
                WrapMode::Repeat => graph.link(split, axis, combine, axis),
                WrapMode::Clamp => {
                    let clamp = graph.add(
                        ShaderNodeKind::Clamp { min: 0.0, max: 1.0 },
                        Some("Clamp UV Component"),
                        (400.0, -(axis as f32) * 100.0),
                    );
                    graph.link(split, axis, clamp, 0);
                    graph.link(clamp, 0, combine, axis);
                }
            }
        }
        tex = graph.add(
            ShaderNodeKind::ImageTexture {
                image: texture.file_name.clone(),
                extension,
            },
            Some("Main Image Texture"),
            (800.0, 0.0),
        );
        graph.link(combine, 0, tex, 0);
    }
    let tex_loc = graph.node(tex).location;

    let mut color_source = (tex, socket::IMAGE_COLOR_OUT);
    let mut alpha_source = (tex, socket::IMAGE_ALPHA_OUT);

    if options.material_mode.uses_vertex_color() {
        // Baked lighting: sampled colour × gamma-corrected vertex colour.
        let vcol = graph.add(
            ShaderNodeKind::VertexColor,
            Some("Vertex Colour RGB"),
            (tex_loc.0 - 200.0, tex_loc.1 + 200.0),
        );
        let gamma = graph.add(
            ShaderNodeKind::Math {
                op: MathOp::Power,
                operand: Some(2.2),
            },
            Some("Gamma Correction"),
            (tex_loc.0, tex_loc.1 + 200.0),
        );
        graph.link(vcol, 0, gamma, 0);
        let multiply = graph.add(
            ShaderNodeKind::MultiplyColor { factor: 1.0 },
            Some("Vertex Colour Multiply"),
            (tex_loc.0 + 200.0, tex_loc.1 + 200.0),
        );
        graph.link(gamma, 0, multiply, 1);
        graph.link(color_source.0, color_source.1, multiply, 2);
        color_source = (multiply, 0);

        // Vertex alpha rides in the second UV set's X coordinate.
        let alpha_layer = uv_sets.get(1).ok_or_else(|| {
            anyhow!(
                "mesh bound to texture '{}' has no second UV set for vertex alpha",
                binding.texture_name
            )
        })?;
        let uv2 = graph.add(
            ShaderNodeKind::UvMap {
                layer: alpha_layer.clone(),
            },
            Some("Alpha UV Map"),
            (tex_loc.0 - 200.0, tex_loc.1 + 400.0),
        );
        let split = graph.add(
            ShaderNodeKind::SeparateXyz,
            Some("Alpha UV Split"),
            (tex_loc.0, tex_loc.1 + 400.0),
        );
        graph.link(uv2, 0, split, 0);
        let alpha_multiply = graph.add(
            ShaderNodeKind::Math {
                op: MathOp::Multiply,
                operand: None,
            },
            Some("Vertex Alpha Multiply"),
            (tex_loc.0 + 200.0, tex_loc.1 + 400.0),
        );
        graph.link(split, 0, alpha_multiply, 0);
        graph.link(alpha_source.0, alpha_source.1, alpha_multiply, 1);
        alpha_source = (alpha_multiply, 0);
    }

    let response = if options.material_mode.unlit() {
        graph.add(
            ShaderNodeKind::Emission {
                strength: options.unlit_emission_strength,
            },
            None,
            (tex_loc.0 + 200.0, tex_loc.1),
        )
    } else {
        graph.add(
            ShaderNodeKind::DiffuseBsdf,
            None,
            (tex_loc.0 + 200.0, tex_loc.1),
        )
    };
    graph.link(
        color_source.0,
        color_source.1,
        response,
        socket::RESPONSE_COLOR_IN,
    );
    let response_loc = graph.node(response).location;

    let mut blend_method = BlendMethod::Opaque;
    if binding.alpha_flags.opaque_only() {
        blend_method = match options.cutout_mode {
            CutoutMode::Always => BlendMethod::Clip,
            CutoutMode::Never => BlendMethod::Opaque,
            CutoutMode::Detect => classify_opacity(texture)?,
        };
    }

    if binding.alpha_flags.alpha_blended() {
        blend_method = options.viewport_alpha_mode.blend_method();

        let is_additive = binding.alpha_flags.additive();
        let is_subtractive = binding.alpha_flags.subtractive();

        let transparent = graph.add(
            ShaderNodeKind::TransparentBsdf {
                color: [1.0, 1.0, 1.0, 1.0],
            },
            None,
            (response_loc.0, response_loc.1 - 200.0),
        );

        if is_additive || is_subtractive {
            blend_method = BlendMethod::Blend;
            if is_subtractive && options.material_mode.unlit() {
                // Subtractive compositing is an additive pass with the
                // emission term sign-inverted.
                let negative = graph.add(
                    ShaderNodeKind::Value {
                        value: -options.unlit_emission_strength,
                    },
                    Some("Negative Emission Strength"),
                    (response_loc.0, response_loc.1 + 200.0),
                );
                graph.link(negative, 0, response, socket::EMISSION_STRENGTH_IN);
            }
            let add = graph.add(
                ShaderNodeKind::AddShader,
                None,
                (response_loc.0 + 200.0, response_loc.1),
            );
            graph.link(transparent, 0, add, 0);
            graph.link(response, 0, add, 1);
            let out = graph.add(
                ShaderNodeKind::MaterialOutput,
                None,
                (response_loc.0 + 400.0, response_loc.1),
            );
            graph.link(add, 0, out, socket::OUTPUT_SURFACE_IN);
        } else {
            let mix = graph.add(
                ShaderNodeKind::MixShader,
                None,
                (response_loc.0 + 200.0, response_loc.1),
            );
            graph.link(alpha_source.0, alpha_source.1, mix, socket::MIX_FAC_IN);
            graph.link(transparent, 0, mix, socket::SHADER_A_IN);
            graph.link(response, 0, mix, socket::SHADER_B_IN);
            let out = graph.add(
                ShaderNodeKind::MaterialOutput,
                None,
                (response_loc.0 + 400.0, response_loc.1),
            );
            graph.link(mix, 0, out, socket::OUTPUT_SURFACE_IN);
        }
    } else {
        let out = graph.add(
            ShaderNodeKind::MaterialOutput,
            None,
            (response_loc.0 + 200.0, response_loc.1),
        );
        graph.link(response, 0, out, socket::OUTPUT_SURFACE_IN);
    }

    let sort_bias = if binding.alpha_flags.alpha_blended() {
        binding.draw_priority
    } else {
        0
    };

    Ok(MaterialBlueprint {
        name: binding.material_name(),
        blend_method,
        shadow_method: blend_method.shadow_method(),
        sort_bias,
        graph,
    })
}

/// Histogram-style opacity classification for opaque-flagged bindings.
fn classify_opacity(texture: &LoadedTexture) -> Result<BlendMethod> {
    match texture.channel_count() {
        3 => Ok(BlendMethod::Opaque),
        4 => {
            if texture.has_translucent_texels() {
                Ok(BlendMethod::Clip)
            } else {
                Ok(BlendMethod::Opaque)
            }
        }
        n => bail!(
            "texture '{}' has an invalid number of channels ({})",
            texture.name,
            n
        ),
    }
}
