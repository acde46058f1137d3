//! Frame Demo
//!
//! Builds a small layer, resolves its geometry in two render contexts,
//! prints a summary and the JSON encoding, then tears everything down.
//!
//! Run with: RUST_LOG=debug cargo run -p lathe_draw --example frame

use std::rc::Rc;

use lathe_core::{BlendMode, Color, Mat4, Vec2, Vec3};
use lathe_draw::{
    serial, DrawDescriptionLayer, DrawGeometryDescription, DrawSpritesDescription,
    DrawTextDescription, SpriteParams,
};
use lathe_geometry::{
    ContextBuilder, ContextRegistry, GeometryConfig, GeometryDescriptor, SphereSettings,
    TextDescriptor,
};

fn build_layer() -> DrawDescriptionLayer {
    let hexagon: Vec<Vec2> = (0..6)
        .map(|i| {
            let theta = i as f32 / 6.0 * std::f32::consts::TAU;
            Vec2::new(theta.cos(), theta.sin())
        })
        .collect();

    let mut polygon = DrawGeometryDescription::new(
        GeometryDescriptor::polygon(hexagon),
        Mat4::IDENTITY,
        Color::from_hex(0x3b82f6),
        BlendMode::Blend,
    );
    polygon.transform(&Mat4::rotation_z(std::f32::consts::FRAC_PI_6));
    polygon.transform(&Mat4::translation(-2.0, 0.0, 0.0));

    let sphere = DrawGeometryDescription::new(
        GeometryDescriptor::Sphere(SphereSettings::default()),
        Mat4::translation(2.0, 0.0, 0.0),
        Color::WHITE,
        BlendMode::Blend,
    );

    let title = DrawTextDescription::new(
        TextDescriptor {
            text: "lathe".into(),
            ..Default::default()
        },
        Mat4::IDENTITY,
        Color::BLACK,
    );

    let sparks = DrawSpritesDescription::new(SpriteParams {
        positions: (0..16).map(|i| Vec3::new(i as f32 * 0.1, 1.0, 0.0)).collect(),
        ..Default::default()
    });

    let scene = DrawDescriptionLayer::new(
        vec![Rc::new(polygon), Rc::new(sphere)],
        vec![Rc::new(title)],
        Vec::new(),
    );
    let overlay = DrawDescriptionLayer::new(Vec::new(), Vec::new(), vec![Rc::new(sparks)]);
    DrawDescriptionLayer::concat(&scene, &overlay)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = GeometryConfig::from_toml_str("tolerance = 0.02\nfallback_quad_size = 0.5")?;
    let mut registry = ContextRegistry::new();
    let main_view = registry.create(ContextBuilder::new().with_config(config.clone()));
    let preview = registry.create(ContextBuilder::new().with_config(config));

    let layer = build_layer();

    // Two frames; the second one is served from the caches
    for frame in 0..2 {
        for &context in &[main_view, preview] {
            let Some(ctx) = registry.get_mut(context) else {
                continue;
            };
            for desc in layer.geometry_descriptions() {
                let key = desc.get_geometry(ctx);
                if let Some(geometry) = ctx.geometry(key) {
                    tracing::info!(
                        "frame {} {:?}: {} vertices, {:?}",
                        frame,
                        context,
                        geometry.vertex_count(),
                        geometry.topology()
                    );
                }
            }
            for desc in layer.text_descriptions() {
                desc.get_geometry(ctx);
            }
        }
    }

    for &context in &[main_view, preview] {
        if let Some(ctx) = registry.get(context) {
            println!("{:?}: {} builds", context, ctx.build_count());
        }
    }

    println!("{}", serial::to_json(&layer)?);

    // The preview goes away first; its entries are forgotten, not released
    registry.teardown(preview);
    layer.forget_context(preview);

    let report = layer.dispose(&mut registry);
    println!("released {} geometries ({} skipped)", report.released, report.failed);
    Ok(())
}
