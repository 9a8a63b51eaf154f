//! Scene assembly: one flat, ordered mesh list per load.

use tracing::{debug, error, info};

use crate::builder::{self, PrimitiveOutcome};
use crate::config::DecodeConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Site};
use crate::error::AssetError;
use crate::glb;
use crate::material::{self, TexturePool};
use crate::mesh::Mesh;
use crate::resource::ResourceLoader;

/// Renderer-side creation hook, invoked once for every mesh appended to the
/// scene. Whatever the hook does with the mesh is its own concern.
pub trait MeshHook {
    fn create_gpu_objects(&mut self, mesh: &Mesh);
}

/// A hook that does nothing, for loads without a renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHook;

impl MeshHook for NullHook {
    fn create_gpu_objects(&mut self, _mesh: &Mesh) {}
}

/// Counts for one successful load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub meshes: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Anomalies that degraded a mesh or image without dropping a primitive.
    pub warnings: usize,
}

/// Owns the meshes produced by the most recent successful load.
#[derive(Debug, Default)]
pub struct Scene {
    config: DecodeConfig,
    meshes: Vec<Mesh>,
    diagnostics: Diagnostics,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecodeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }

    /// Anomalies recorded by the most recent successful load.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.entries()
    }

    /// Load the named container, replacing the current meshes.
    ///
    /// Returns whether the container could be read and parsed. Skipped or
    /// failed primitives do not make the load fail; check
    /// [`diagnostics`](Self::diagnostics) for them. On failure the previous
    /// meshes are kept.
    pub fn load(&mut self, name: &str, loader: &dyn ResourceLoader, hook: &mut dyn MeshHook) -> bool {
        match self.try_load(name, loader, hook) {
            Ok(_) => true,
            Err(e) => {
                error!("Failed to load '{}': {}", name, e);
                false
            }
        }
    }

    pub fn try_load(
        &mut self,
        name: &str,
        loader: &dyn ResourceLoader,
        hook: &mut dyn MeshHook,
    ) -> Result<LoadSummary, AssetError> {
        info!("Loading GLB: {}", name);
        let bytes = loader.read(name)?;
        debug!("Resource size: {} bytes", bytes.len());
        self.load_bytes(&bytes, hook)
    }

    /// Decode a container already in memory, replacing the current meshes.
    pub fn load_bytes(&mut self, bytes: &[u8], hook: &mut dyn MeshHook) -> Result<LoadSummary, AssetError> {
        let mut document = glb::parse_with(bytes, &self.config)?;
        info!(
            "Loaded model: {} meshes, {} images",
            document.meshes().len(),
            document.images.len()
        );

        let mut diagnostics = Diagnostics::new();
        let images = std::mem::take(&mut document.images);
        let mut pool = TexturePool::decode(images, &self.config, &mut diagnostics);
        let mut meshes = Vec::new();
        let mut summary = LoadSummary::default();

        for (mesh_index, mesh_def) in document.meshes().iter().enumerate() {
            debug!(
                "Mesh {} has {} primitives",
                mesh_index,
                mesh_def.primitives.len()
            );

            for (primitive_index, primitive) in mesh_def.primitives.iter().enumerate() {
                let site = Site::Primitive {
                    mesh: mesh_index,
                    primitive: primitive_index,
                };

                match builder::build(&document, primitive, &self.config, site, &mut diagnostics) {
                    PrimitiveOutcome::Built(mut mesh) => {
                        mesh.name = mesh_def.name.clone();
                        let material_index = primitive.material.as_ref().map(|index| index.value());
                        match material::resolve(&document, material_index, &mut pool) {
                            Ok(texture) => mesh.texture = texture,
                            Err(issue) => diagnostics.record(site, DiagnosticKind::Texture(issue)),
                        }

                        hook.create_gpu_objects(&mesh);
                        meshes.push(mesh);
                    }
                    PrimitiveOutcome::Skipped(reason) => {
                        summary.skipped += 1;
                        diagnostics.record(site, DiagnosticKind::Skipped(reason));
                    }
                    PrimitiveOutcome::Failed(e) => {
                        summary.failed += 1;
                        diagnostics.record(site, DiagnosticKind::Failed(e));
                    }
                }
            }
        }

        summary.meshes = meshes.len();
        summary.warnings = diagnostics.warning_count();
        info!(
            "Total meshes loaded: {} ({} skipped, {} failed, {} warnings)",
            summary.meshes, summary.skipped, summary.failed, summary.warnings
        );

        self.meshes = meshes;
        self.diagnostics = diagnostics;
        Ok(summary)
    }
}
