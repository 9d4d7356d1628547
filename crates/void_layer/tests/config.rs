//! Layer configuration and shared collaborators

use void_layer::prelude::*;

fn draw(layer: &Layer) -> (RecordingDevice, LayerDrawStats) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut device = RecordingDevice::new();
    let mut pool = PartitionResultPool::new();
    let mut lines = DebugLines::new();
    let stats = layer.draw(&mut DrawContext::new(&mut device, &mut pool, &mut lines));
    (device, stats)
}

#[test]
fn test_layer_from_json_config() {
    let json = r#"{
        "sort_mode": "x_descending",
        "sort_scale": { "x": 0.0, "y": 1.0, "z": 0.0, "priority": 0.5 },
        "partition_cull_2d": true,
        "show_debug_lines": false,
        "parallax": [0.5, 0.25]
    }"#;
    let config = LayerConfig::from_json(json).unwrap();
    let layer = Layer::with_config(&config).unwrap();

    assert_eq!(layer.sort_mode(), SortMode::XDescending);
    assert_eq!(layer.sort_scale().to_array(), [0.0, 1.0, 0.0, 0.5]);
    assert!(layer.partition_cull_2d());
    assert!(!layer.shows_debug_lines());
    assert_eq!(layer.parallax(), Vec2::new(0.5, 0.25));
    assert_eq!(layer.config(), config);
}

#[test]
fn test_config_snapshot_round_trips() {
    let mut layer = Layer::new();
    layer.set_sort_mode(SortMode::VectorDescending);
    layer.set_sort_scale(0.0, 0.0, 1.0, 2.0);
    layer.set_parallax(2.0, 3.0);

    let json = layer.config().to_json().unwrap();
    let mut other = Layer::new();
    other.apply_config(&LayerConfig::from_json(&json).unwrap()).unwrap();

    assert_eq!(other.config(), layer.config());
}

#[test]
fn test_config_sort_mode_drives_dispatch() {
    let config = LayerConfig::from_json(r#"{ "sort_mode": "x_descending" }"#).unwrap();
    let mut layer = Layer::with_config(&config).unwrap();
    layer.set_viewport(Some(shared(Viewport::from_size(640.0, 480.0))));

    for x in [-50.0, 75.0, 10.0] {
        layer.insert_prop(share_prop(BasicProp::square(Vec3::new(x, 0.0, 0.0), 1.0)));
    }

    let (device, _) = draw(&layer);
    let xs: Vec<f32> = device.draw_calls().map(|c| c.world.w_axis.x).collect();
    assert_eq!(xs, vec![75.0, 10.0, -50.0]);
}

#[test]
fn test_parallax_does_not_change_rendering() {
    let mut layer = Layer::new();
    layer.set_viewport(Some(shared(Viewport::from_size(640.0, 480.0))));
    layer.insert_prop(share_prop(BasicProp::square(Vec3::new(100.0, 0.0, 0.0), 1.0)));

    let (before, _) = draw(&layer);
    layer.set_parallax(0.1, 4.0);
    let (after, _) = draw(&layer);

    assert_eq!(before.commands(), after.commands());
}

#[test]
fn test_layers_share_camera_and_partition() {
    let camera = shared(Camera::orthographic());
    let partition = shared(Partition::new());
    partition
        .write()
        .insert_prop(share_prop(BasicProp::square(Vec3::new(900.0, 0.0, 0.0), 2.0)));

    let mut layers: Vec<Layer> = (0..2)
        .map(|_| {
            let mut layer = Layer::new();
            layer.set_viewport(Some(shared(Viewport::from_size(640.0, 480.0))));
            layer.set_camera(Some(camera.clone()));
            layer.set_partition(Some(partition.clone()));
            layer
        })
        .collect();

    assert!(layers.iter().all(|l| draw(l).1.gathered == 0));

    camera.write().location = Vec3::new(900.0, 0.0, 0.0);
    assert!(layers.iter().all(|l| draw(l).1.drawn == 1));

    // detaching from one layer leaves the other untouched
    layers[0].set_partition(None);
    assert_eq!(draw(&layers[0]).1.gathered, 0);
    assert_eq!(draw(&layers[1]).1.drawn, 1);
}

#[test]
fn test_config_built_in_code_is_validated() {
    let config = LayerConfig {
        sort_scale: SortScale::new(f32::NAN, 0.0, 0.0, 1.0),
        ..LayerConfig::default()
    };
    assert!(matches!(Layer::with_config(&config), Err(LayerError::InvalidConfig(_))));

    let mut layer = Layer::new();
    layer.set_sort_mode(SortMode::YAscending);
    let err = layer
        .apply_config(&LayerConfig {
            sort_mode: SortMode::XDescending,
            parallax: Vec2::new(f32::INFINITY, 1.0),
            ..LayerConfig::default()
        })
        .unwrap_err();

    assert!(matches!(err, LayerError::InvalidConfig(_)));
    assert_eq!(layer.sort_mode(), SortMode::YAscending);
}

#[test]
fn test_invalid_raw_sort_mode_is_an_error() {
    let mut layer = Layer::new();
    let err = layer.set_sort_mode_raw(12).unwrap_err();
    assert!(matches!(err, LayerError::InvalidSortMode(12)));
    assert_eq!(err.to_string(), "Invalid sort mode: 12");
}
