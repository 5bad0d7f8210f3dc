//! Shading-graph blueprint IR.
//!
//! Materials are synthesized as plain data (a node list plus socket-indexed
//! links) that a host-side glue layer realizes in its own node-graph system.
//! Nothing here renders; the blueprint is the deliverable.

pub mod builder;

use serde::{Deserialize, Serialize};

/// Index of a node inside one [`ShaderGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// Sampling behavior outside the unit UV square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureExtension {
    Repeat,
    Extend,
}

/// Scalar math operations used by the synthesized graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathOp {
    Multiply,
    Power,
}

/// Node kinds the synthesizer emits. Socket indices follow the conventions
/// in [`socket`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShaderNodeKind {
    /// Reads a named UV set of the mesh.
    UvMap { layer: String },
    /// Samples a named image. Outputs colour (0) and alpha (1).
    ImageTexture {
        image: String,
        extension: TextureExtension,
    },
    /// Vector → three scalar components.
    SeparateXyz,
    /// Three scalar components → vector.
    CombineXyz,
    /// Clamps a scalar into `[min, max]`.
    Clamp { min: f32, max: f32 },
    /// Reads the mesh's vertex colour attribute.
    VertexColor,
    /// Scalar math; `operand` is the constant second input, if any.
    Math { op: MathOp, operand: Option<f32> },
    /// Component-wise colour multiply of inputs 1 and 2, weighted by factor.
    MultiplyColor { factor: f32 },
    /// Emissive response (unlit rendering).
    Emission { strength: f32 },
    /// Diffuse response (lit rendering).
    DiffuseBsdf,
    /// Pass-through transparency with the given tint.
    TransparentBsdf { color: [f32; 4] },
    /// Coverage mix of two shader inputs driven by a factor.
    MixShader,
    /// Sum of two shader inputs.
    AddShader,
    /// Constant scalar.
    Value { value: f32 },
    /// Final surface output; every graph has exactly one.
    MaterialOutput,
}

/// Socket index conventions shared by the synthesizer and its tests.
pub mod socket {
    /// Colour output of an image texture node.
    pub const IMAGE_COLOR_OUT: u32 = 0;
    /// Alpha output of an image texture node.
    pub const IMAGE_ALPHA_OUT: u32 = 1;
    /// Factor input of a mix-shader node.
    pub const MIX_FAC_IN: u32 = 0;
    /// First shader input of a mix/add-shader node.
    pub const SHADER_A_IN: u32 = 1;
    /// Second shader input of a mix-shader node; add-shader uses (0, 1).
    pub const SHADER_B_IN: u32 = 2;
    /// Colour input of an emission or diffuse node.
    pub const RESPONSE_COLOR_IN: u32 = 0;
    /// Strength input of an emission node.
    pub const EMISSION_STRENGTH_IN: u32 = 1;
    /// Surface input of the material output node.
    pub const OUTPUT_SURFACE_IN: u32 = 0;
}

/// A node plus the presentation hints the original authoring tool kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShaderNode {
    pub kind: ShaderNodeKind,
    /// Editor label, when the original graph carried one.
    pub label: Option<String>,
    /// Editor layout hint.
    pub location: (f32, f32),
}

/// Directed link between two node sockets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderLink {
    pub from_node: NodeId,
    pub from_socket: u32,
    pub to_node: NodeId,
    pub to_socket: u32,
}

/// A complete shading network for one material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShaderGraph {
    pub nodes: Vec<ShaderNode>,
    pub links: Vec<ShaderLink>,
}

impl ShaderGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![],
            links: vec![],
        }
    }

    pub fn add(
        &mut self,
        kind: ShaderNodeKind,
        label: Option<&str>,
        location: (f32, f32),
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ShaderNode {
            kind,
            label: label.map(|s| s.to_string()),
            location,
        });
        id
    }

    pub fn link(&mut self, from_node: NodeId, from_socket: u32, to_node: NodeId, to_socket: u32) {
        self.links.push(ShaderLink {
            from_node,
            from_socket,
            to_node,
            to_socket,
        });
    }

    pub fn node(&self, id: NodeId) -> &ShaderNode {
        &self.nodes[id.0]
    }

    /// Nodes matching a predicate on their kind.
    pub fn find_nodes<'a>(
        &'a self,
        pred: impl Fn(&ShaderNodeKind) -> bool + 'a,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| pred(&n.kind))
            .map(|(i, _)| NodeId(i))
    }

    pub fn count_nodes(&self, pred: impl Fn(&ShaderNodeKind) -> bool) -> usize {
        self.find_nodes(pred).count()
    }

    /// Links arriving at the given node.
    pub fn links_into(&self, id: NodeId) -> impl Iterator<Item = &ShaderLink> {
        self.links.iter().filter(move |l| l.to_node == id)
    }

    /// Links leaving the given node.
    pub fn links_out_of(&self, id: NodeId) -> impl Iterator<Item = &ShaderLink> {
        self.links.iter().filter(move |l| l.from_node == id)
    }
}

impl Default for ShaderGraph {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Blend / shadow classification
// ============================================================================

/// How the surface composites against what is behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMethod {
    Opaque,
    Clip,
    Hashed,
    Blend,
}

/// How the surface participates in shadow passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowMethod {
    Opaque,
    Clip,
    Hashed,
}

impl BlendMethod {
    /// Graded blending cannot cast graded shadows, so `Blend` degrades to
    /// `Hashed`; everything else shadows the way it draws.
    pub fn shadow_method(self) -> ShadowMethod {
        match self {
            BlendMethod::Opaque => ShadowMethod::Opaque,
            BlendMethod::Clip => ShadowMethod::Clip,
            BlendMethod::Hashed => ShadowMethod::Hashed,
            BlendMethod::Blend => ShadowMethod::Hashed,
        }
    }
}

/// Everything a host needs to realize one material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialBlueprint {
    pub name: String,
    pub blend_method: BlendMethod,
    pub shadow_method: ShadowMethod,
    /// Painter-order bias for transparent surfaces (higher = drawn later);
    /// 0 for opaque materials.
    pub sort_bias: i32,
    pub graph: ShaderGraph,
}
