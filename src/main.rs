//! Glimmer - binary glTF scene loader
//!
//! Loads a container by name, prepares every mesh for upload and prints a
//! summary of what was decoded.

mod settings;

use anyhow::{Context, Result};
use glimmer_assets::{FileLoader, Scene};
use glimmer_render::{UploadRecorder, VertexLayout};
use tracing::info;
use tracing_subscriber::EnvFilter;

use settings::ViewerSettings;

fn main() -> Result<()> {
    let settings = ViewerSettings::load();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .with_target(false)
        .init();

    let name = std::env::args()
        .nth(1)
        .context("usage: glimmer <container.glb>")?;

    let loader = FileLoader::new(&settings.asset_root);
    let mut scene = Scene::with_config(settings.decode.clone());
    let mut recorder = UploadRecorder::new();

    let summary = scene
        .try_load(&name, &loader, &mut recorder)
        .with_context(|| format!("Failed to load '{}'", name))?;

    let layout = VertexLayout::standard();
    info!(
        "Vertex layout: stride {} bytes, {} attributes",
        layout.stride,
        layout.attributes.len()
    );

    for (index, (mesh, upload)) in scene.meshes().iter().zip(recorder.uploads()).enumerate() {
        let texture = match &upload.texture {
            Some(t) => format!("{}x{} ({} channels)", t.width, t.height, t.channels),
            None => "none".to_string(),
        };
        println!(
            "mesh {:>3} {:<24} vertices {:>7} indices {:>8} radius {:>10.4} texture {}",
            index,
            mesh.name.as_deref().unwrap_or("unnamed"),
            mesh.vertex_count(),
            mesh.index_count(),
            mesh.bounds.radius,
            texture
        );
    }

    for diagnostic in scene.diagnostics() {
        println!("warning: {}", diagnostic);
    }

    println!(
        "{} meshes, {} skipped, {} failed, {} warnings, {} bytes prepared for upload",
        summary.meshes,
        summary.skipped,
        summary.failed,
        summary.warnings,
        recorder.total_bytes()
    );

    Ok(())
}
