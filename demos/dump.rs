//! Loads a `.glb`/`.gltf` file and reports what a code generator would see.
//!
//! ```text
//! cargo run --example dump -- model.glb [--json]
//! ```

use gltf_bake::{Document, LoadOptions, primitive_view};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or("usage: dump <file.glb|file.gltf> [--json]")?;
    let print_json = args.any(|a| a == "--json");

    let document = Document::open(&path, &LoadOptions::default())?;
    if print_json {
        println!("{}", serde_json::to_string_pretty(document.json())?);
    }

    for (ix, accessor) in document.root().accessors.iter().enumerate() {
        let elements = document.decode(ix)?.collect::<Result<Vec<_>, _>>()?;
        tracing::info!(
            "accessor {}: {} x {} {:?}",
            ix,
            elements.len(),
            accessor.element_type.name(),
            accessor.component_type
        );
    }

    for (ix, mesh) in document.root().meshes.iter().enumerate() {
        let primitive = primitive_view(mesh)?;
        tracing::info!("mesh {}: {:?}", ix, primitive);
    }

    let graph = document.scene_graph()?;
    for &ix in graph.order() {
        let node = document.node(ix)?;
        tracing::info!(
            "node {} parent={:?} mesh={:?} skin={:?} t={:?} r={:?} s={:?}",
            ix,
            graph.parent_of(ix),
            node.mesh,
            node.skin,
            node.translation_or_default(),
            node.rotation_or_default(),
            node.scale_or_default()
        );
    }

    Ok(())
}
