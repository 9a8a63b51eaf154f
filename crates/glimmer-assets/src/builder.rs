//! Builds one mesh per primitive.

use glimmer_core::BoundingSphere;
use gltf::json::mesh::{Primitive, Semantic};
use tracing::debug;

use crate::accessor;
use crate::config::DecodeConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics, Site};
use crate::document::{self, Document};
use crate::error::ResolveError;
use crate::mesh::{Mesh, Vertex};

const NORMAL: &str = "NORMAL";
const TEXCOORD_0: &str = "TEXCOORD_0";

/// Why a primitive contributes nothing to the scene.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("no position attribute")]
    NoPosition,

    #[error("unsupported index type")]
    UnsupportedIndexType,

    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// Result of building a single primitive.
#[derive(Debug)]
pub enum PrimitiveOutcome {
    Built(Mesh),
    Skipped(SkipReason),
    Failed(ResolveError),
}

impl PrimitiveOutcome {
    pub fn mesh(&self) -> Option<&Mesh> {
        match self {
            PrimitiveOutcome::Built(mesh) => Some(mesh),
            _ => None,
        }
    }
}

/// Build an untextured mesh from a primitive.
///
/// POSITION is mandatory. NORMAL and TEXCOORD_0 overwrite the zero defaults
/// when present and well-formed; a malformed or mismatched optional attribute
/// is recorded against `site` and ignored. Without an index accessor the
/// indices are `0..vertex_count`.
pub fn build(
    document: &Document,
    primitive: &Primitive,
    config: &DecodeConfig,
    site: Site,
    diagnostics: &mut Diagnostics,
) -> PrimitiveOutcome {
    let Some(position_accessor) = document::attribute(primitive, Semantic::Positions) else {
        return PrimitiveOutcome::Skipped(SkipReason::NoPosition);
    };

    let positions = match accessor::resolve(document, position_accessor)
        .and_then(|view| view.read_vec3_f32())
    {
        Ok(positions) => positions,
        Err(e) => return PrimitiveOutcome::Failed(e),
    };

    let vertex_count = positions.len();
    let mut vertices: Vec<Vertex> = positions.into_iter().map(Vertex::at).collect();
    debug!("Vertex count: {}", vertex_count);

    let bounds = BoundingSphere::from_positions(vertices.iter().map(|v| &v.position));

    if let Some(index) = document::attribute(primitive, Semantic::Normals) {
        match read_attribute(document, NORMAL, index, vertex_count, |v| v.read_vec3_f32()) {
            Ok(normals) => {
                for (vertex, normal) in vertices.iter_mut().zip(normals) {
                    vertex.normal = normal;
                }
            }
            Err(error) => diagnostics.record(
                site,
                DiagnosticKind::AttributeIgnored {
                    attribute: NORMAL.into(),
                    error,
                },
            ),
        }
    }

    if let Some(index) = document::attribute(primitive, Semantic::TexCoords(0)) {
        match read_attribute(document, TEXCOORD_0, index, vertex_count, |v| v.read_vec2_f32()) {
            Ok(uvs) => {
                for (vertex, uv) in vertices.iter_mut().zip(uvs) {
                    vertex.tex_coord = uv;
                }
            }
            Err(error) => diagnostics.record(
                site,
                DiagnosticKind::AttributeIgnored {
                    attribute: TEXCOORD_0.into(),
                    error,
                },
            ),
        }
    }

    let indices = match primitive.indices.as_ref().map(|index| index.value()) {
        Some(index_accessor) => {
            match accessor::resolve(document, index_accessor).and_then(|view| view.read_indices()) {
                Ok(indices) => indices,
                Err(ResolveError::UnsupportedIndexType(kind)) => {
                    debug!("Unsupported index component type {:?}", kind);
                    return PrimitiveOutcome::Skipped(SkipReason::UnsupportedIndexType);
                }
                Err(ResolveError::UnknownFormat(_)) => {
                    debug!("Unknown index component type");
                    return PrimitiveOutcome::Skipped(SkipReason::UnsupportedIndexType);
                }
                Err(e) => return PrimitiveOutcome::Failed(e),
            }
        }
        None => {
            debug!("Primitive has no indices, generated default indices");
            (0..vertex_count as u32).collect()
        }
    };

    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return PrimitiveOutcome::Skipped(SkipReason::IndexOutOfRange {
            index,
            vertex_count,
        });
    }

    PrimitiveOutcome::Built(Mesh {
        name: None,
        vertices,
        indices,
        bounds,
        texture: None,
        placement: config.placement,
    })
}

fn read_attribute<T>(
    document: &Document,
    name: &str,
    accessor_index: usize,
    vertex_count: usize,
    read: impl FnOnce(&accessor::TypedView<'_>) -> Result<Vec<T>, ResolveError>,
) -> Result<Vec<T>, ResolveError> {
    let view = accessor::resolve(document, accessor_index)?;
    if view.count() != vertex_count {
        return Err(ResolveError::CountMismatch {
            attribute: name.into(),
            expected: vertex_count,
            found: view.count(),
        });
    }
    read(&view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{primitive, GlbBuilder};
    use glimmer_core::Vec3;

    const QUAD: [[f32; 3]; 4] = [
        [-1.0, -1.0, 0.0],
        [1.0, -1.0, 0.0],
        [1.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0],
    ];

    fn build_first(builder: &GlbBuilder) -> (PrimitiveOutcome, Diagnostics) {
        let document = builder.document();
        let mut diagnostics = Diagnostics::new();
        let outcome = build(
            &document,
            &document.meshes()[0].primitives[0],
            &DecodeConfig::default(),
            Site::Primitive {
                mesh: 0,
                primitive: 0,
            },
            &mut diagnostics,
        );
        (outcome, diagnostics)
    }

    fn built(outcome: PrimitiveOutcome) -> Mesh {
        match outcome {
            PrimitiveOutcome::Built(mesh) => mesh,
            other => panic!("expected a built mesh, got {:?}", other),
        }
    }

    #[test]
    fn builds_full_primitive() {
        let mut builder = GlbBuilder::new();
        let positions = builder.vec3_f32(&QUAD);
        let normals = builder.vec3_f32(&[[0.0, 0.0, 1.0]; 4]);
        let uvs = builder.vec2_f32(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        let indices = builder.indices_u16(&[0, 1, 2, 2, 3, 0]);
        builder.mesh(vec![primitive(
            &[("POSITION", positions), ("NORMAL", normals), ("TEXCOORD_0", uvs)],
            Some(indices),
            None,
        )]);

        let (outcome, diagnostics) = build_first(&builder);
        let mesh = built(outcome);
        assert!(diagnostics.is_empty());
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 2, 3, 0]);
        assert_eq!(mesh.vertices[2].position, [1.0, 1.0, 0.0]);
        assert_eq!(mesh.vertices[2].normal, [0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices[2].tex_coord, [1.0, 1.0]);
        assert_eq!(mesh.bounds.center, Vec3::ZERO);
        assert!((mesh.bounds.radius - 2.0f32.sqrt()).abs() < 1e-6);
        assert!(mesh.texture.is_none());
    }

    #[test]
    fn missing_position_is_skipped() {
        let mut builder = GlbBuilder::new();
        let normals = builder.vec3_f32(&[[0.0, 1.0, 0.0]]);
        builder.mesh(vec![primitive(&[("NORMAL", normals)], None, None)]);

        let (outcome, _) = build_first(&builder);
        assert!(matches!(
            outcome,
            PrimitiveOutcome::Skipped(SkipReason::NoPosition)
        ));
    }

    #[test]
    fn unindexed_primitive_gets_identity_indices() {
        let mut builder = GlbBuilder::new();
        let positions = builder.vec3_f32(&QUAD);
        builder.mesh(vec![primitive(&[("POSITION", positions)], None, None)]);

        let mesh = built(build_first(&builder).0);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn missing_normals_and_uvs_default_to_zero() {
        let mut builder = GlbBuilder::new();
        let positions = builder.vec3_f32(&QUAD);
        builder.mesh(vec![primitive(&[("POSITION", positions)], None, None)]);

        let mesh = built(build_first(&builder).0);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0; 3]));
        assert!(mesh.vertices.iter().all(|v| v.tex_coord == [0.0; 2]));
    }

    #[test]
    fn u32_indices_are_copied_verbatim() {
        let mut builder = GlbBuilder::new();
        let positions = builder.vec3_f32(&QUAD);
        let indices = builder.indices_u32(&[3, 2, 1]);
        builder.mesh(vec![primitive(&[("POSITION", positions)], Some(indices), None)]);

        let mesh = built(build_first(&builder).0);
        assert_eq!(mesh.indices, vec![3, 2, 1]);
    }

    #[test]
    fn u8_indices_skip_the_primitive() {
        let mut builder = GlbBuilder::new();
        let positions = builder.vec3_f32(&QUAD);
        let indices = builder.indices_u8(&[0, 1, 2]);
        builder.mesh(vec![primitive(&[("POSITION", positions)], Some(indices), None)]);

        assert!(matches!(
            build_first(&builder).0,
            PrimitiveOutcome::Skipped(SkipReason::UnsupportedIndexType)
        ));
    }

    #[test]
    fn unknown_index_component_type_skips_the_primitive() {
        let mut builder = GlbBuilder::new();
        let positions = builder.vec3_f32(&QUAD);
        let view = builder.raw_view(&[0u8; 12]);
        let indices = builder.raw_accessor(serde_json::json!({
            "bufferView": view, "componentType": 5130, "count": 3, "type": "SCALAR"
        }));
        builder.mesh(vec![primitive(&[("POSITION", positions)], Some(indices), None)]);

        assert!(matches!(
            build_first(&builder).0,
            PrimitiveOutcome::Skipped(SkipReason::UnsupportedIndexType)
        ));
    }

    #[test]
    fn unknown_position_component_type_fails_the_primitive() {
        let mut builder = GlbBuilder::new();
        let view = builder.raw_view(&[0u8; 12]);
        let positions = builder.raw_accessor(serde_json::json!({
            "bufferView": view, "componentType": 5999, "count": 1, "type": "VEC3"
        }));
        builder.mesh(vec![primitive(&[("POSITION", positions)], None, None)]);

        assert!(matches!(
            build_first(&builder).0,
            PrimitiveOutcome::Failed(ResolveError::UnknownFormat(_))
        ));
    }

    #[test]
    fn dangling_position_accessor_fails_the_primitive() {
        let mut builder = GlbBuilder::new();
        builder.mesh(vec![primitive(&[("POSITION", 99)], None, None)]);

        assert!(matches!(
            build_first(&builder).0,
            PrimitiveOutcome::Failed(ResolveError::MissingAccessor(99))
        ));
    }

    #[test]
    fn index_past_vertex_count_skips_the_primitive() {
        let mut builder = GlbBuilder::new();
        let positions = builder.vec3_f32(&QUAD);
        let indices = builder.indices_u16(&[0, 1, 4]);
        builder.mesh(vec![primitive(&[("POSITION", positions)], Some(indices), None)]);

        assert!(matches!(
            build_first(&builder).0,
            PrimitiveOutcome::Skipped(SkipReason::IndexOutOfRange {
                index: 4,
                vertex_count: 4
            })
        ));
    }

    #[test]
    fn mismatched_normal_count_keeps_defaults() {
        let mut builder = GlbBuilder::new();
        let positions = builder.vec3_f32(&QUAD);
        let normals = builder.vec3_f32(&[[0.0, 0.0, 1.0]; 3]);
        builder.mesh(vec![primitive(
            &[("POSITION", positions), ("NORMAL", normals)],
            None,
            None,
        )]);

        let (outcome, diagnostics) = build_first(&builder);
        let mesh = built(outcome);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0; 3]));
        assert_eq!(
            diagnostics.entries()[0].kind,
            DiagnosticKind::AttributeIgnored {
                attribute: "NORMAL".into(),
                error: ResolveError::CountMismatch {
                    attribute: "NORMAL".into(),
                    expected: 4,
                    found: 3
                }
            }
        );
    }

    #[test]
    fn wrongly_typed_uvs_are_ignored() {
        let mut builder = GlbBuilder::new();
        let positions = builder.vec3_f32(&QUAD);
        let uvs = builder.vec3_f32(&QUAD);
        builder.mesh(vec![primitive(
            &[("POSITION", positions), ("TEXCOORD_0", uvs)],
            None,
            None,
        )]);

        let (outcome, diagnostics) = build_first(&builder);
        let mesh = built(outcome);
        assert!(mesh.vertices.iter().all(|v| v.tex_coord == [0.0; 2]));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn out_of_bounds_positions_fail_the_primitive() {
        let mut builder = GlbBuilder::new();
        let view = builder.raw_view(&[0u8; 12]);
        let positions = builder.raw_accessor(serde_json::json!({
            "bufferView": view, "componentType": 5126, "count": 4, "type": "VEC3"
        }));
        builder.mesh(vec![primitive(&[("POSITION", positions)], None, None)]);

        assert!(matches!(
            build_first(&builder).0,
            PrimitiveOutcome::Failed(ResolveError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn empty_primitive_has_degenerate_bounds() {
        let mut builder = GlbBuilder::new();
        let positions = builder.vec3_f32(&[]);
        builder.mesh(vec![primitive(&[("POSITION", positions)], None, None)]);

        let mesh = built(build_first(&builder).0);
        assert!(mesh.vertices.is_empty());
        assert!(mesh.indices.is_empty());
        assert_eq!(mesh.bounds.center, Vec3::ZERO);
        assert_eq!(mesh.bounds.radius, 0.0);
    }

    #[test]
    fn bounds_enclose_all_vertices() {
        let mut builder = GlbBuilder::new();
        let positions = builder.vec3_f32(&[
            [3.0, -7.0, 2.0],
            [5.5, 1.0, -4.0],
            [-2.0, 0.5, 9.0],
            [0.0, 0.0, 0.0],
        ]);
        builder.mesh(vec![primitive(&[("POSITION", positions)], None, None)]);

        let mesh = built(build_first(&builder).0);
        for vertex in &mesh.vertices {
            assert!(mesh.bounds.contains(Vec3::from_array(vertex.position), 1e-4));
        }
    }
}
