//! Headless layer demonstration
//!
//! This example shows:
//! - A 2D layer with a camera, viewport and a handful of props
//! - Sorted dispatch through the recording device
//! - Camera fitting and window -> world picking
//! - A second layer nested as a prop, rendering offscreen

use std::num::NonZeroU32;

use void_layer::prelude::*;

/// Physics world stand-in: outlines one static body
struct GroundOutline;

impl PhysicsDebugDraw for GroundOutline {
    fn draw_debug(&self, _gfx: &mut dyn GfxDevice, lines: &mut DebugLines) {
        lines.push_rect(DebugLineKind::PhysicsShapes, &Rect::new(-300.0, -220.0, 300.0, -200.0), 0.0);
    }
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_default_env().init();

    println!("Headless Layer Demo");
    println!("===================\n");

    let config = LayerConfig::from_json(r#"{ "sort_mode": "vector_ascending", "sort_scale": { "x": 0.0, "y": -1.0, "z": 0.0, "priority": 0.0 } }"#)
        .unwrap_or_else(|err| {
            eprintln!("bad config, using defaults: {}", err);
            LayerConfig::default()
        });

    let camera = shared(Camera::orthographic());
    let mut world = Layer::with_config(&config).unwrap_or_default();
    world.set_viewport(Some(shared(Viewport::from_size(640.0, 480.0))));
    world.set_camera(Some(camera.clone()));
    world.set_physics_debug(PhysicsBackend::Box2D, Some(shared(GroundOutline)));

    // top-down sprites: lower on screen draws later
    for (i, (x, y)) in [(-120.0, 80.0), (40.0, -60.0), (200.0, 20.0), (900.0, 0.0)].into_iter().enumerate() {
        let prop = BasicProp::square(Vec3::new(x, y, 0.0), 16.0).with_priority(i as i32);
        println!("Prop {:?} at ({}, {})", prop.id(), x, y);
        world.insert_prop(share_prop(prop));
    }

    // minimap: its own layer, drawn into a realized frame buffer
    let mut minimap = Layer::new();
    minimap.set_viewport(Some(shared(Viewport::from_size(128.0, 128.0))));
    let mut target = FrameBuffer::new("minimap", 128, 128);
    target.realize(NonZeroU32::MIN);
    minimap.set_frame_buffer(Some(shared(target)));
    minimap.insert_prop(share_prop(BasicProp::square(Vec3::ZERO, 8.0)));
    minimap.set_priority(100);
    world.insert_prop(share_prop(minimap));

    let mut device = RecordingDevice::new();
    let mut pool = PartitionResultPool::new();
    let mut lines = DebugLines::new();
    lines.set_style(DebugLineKind::PhysicsShapes, DebugLineStyle::new([0.2, 0.9, 0.2, 1.0], 1.0));

    let stats = world.draw(&mut DrawContext::new(&mut device, &mut pool, &mut lines));
    println!("\nFrame 1: gathered {}, drawn {}", stats.gathered, stats.drawn);
    for call in device.draw_calls() {
        println!(
            "  draw {:?} sub {} reload {} at {:?}",
            call.prop,
            call.sub_prim,
            call.reload_state,
            call.world.w_axis.truncate()
        );
    }
    println!("  {} commands, {} flushes, {} debug line vertices", device.commands().len(), device.flush_count(), device.line_vertex_count());

    // frame everything, then move the camera there
    let fit = world.fitting(Rect::new(-120.0, -60.0, 900.0, 80.0), 16.0, 16.0);
    println!("\nFitting: center ({}, {}), scale {:.3}", fit.x, fit.y, fit.scale);
    {
        let mut camera = camera.write();
        camera.location = Vec3::new(fit.x, fit.y, 0.0);
        camera.scale = Vec3::new(1.0 / fit.scale, 1.0 / fit.scale, 1.0);
    }

    device.take_commands();
    let stats = world.draw(&mut DrawContext::new(&mut device, &mut pool, &mut lines));
    println!("Frame 2: gathered {}, drawn {}", stats.gathered, stats.drawn);

    // pick under the window center
    let ray = world.wnd_to_world(Vec3::new(320.0, 240.0, 0.0));
    println!("\nWindow center -> world {:?}, ray {:?}", ray.origin, ray.direction);
    for prop in world.pick(Vec2::new(320.0, 240.0), CapabilitySet::ALL) {
        println!("  picked {:?}", prop.read().id());
    }

    match LayerConfig::to_json(&world.config()) {
        Ok(json) => println!("\nLayer config:\n{}", json),
        Err(err) => eprintln!("config serialization failed: {}", err),
    }
}
