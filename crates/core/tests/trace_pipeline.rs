//! Integration test: detect a compositor trace from raw bytes, decode
//! it, build the hierarchy tree for one snapshot, and run the standard
//! computation pipeline over it.

use uiscope_core::computations::{
    Computation, RectsComputation, VisibilityReasonsComputation, run_pipeline,
};
use uiscope_core::model::TraceEntry;
use uiscope_core::parsers::{ParseError, detect_parser};
use uiscope_core::timestamp::ClockDomain;
use uiscope_core::trace_type::TraceType;
use uiscope_core::tree::from_layers_snapshot;

fn layers_buffer() -> Vec<u8> {
    let json = r#"{
        "realToElapsedTimeOffsetNs": 1000000,
        "entries": [
            {
                "elapsedNs": 100,
                "displays": [
                    {"id": 1, "layerStack": 0, "name": "Built-in Screen",
                     "layerStackSpaceRect": {"left": 0, "top": 0, "right": 1080, "bottom": 2400},
                     "size": {"w": 1080, "h": 2400}}
                ],
                "layers": [
                    {"id": 1, "name": "Wallpaper", "parent": -1, "zOrderPath": [0],
                     "layerStack": 0,
                     "screenBounds": {"left": 0, "top": 0, "right": 1080, "bottom": 2400},
                     "isComputedVisible": true},
                    {"id": 2, "name": "App", "parent": 1, "zOrderPath": [0, 1],
                     "layerStack": 0,
                     "screenBounds": {"left": 0, "top": 0, "right": 1080, "bottom": 2400},
                     "isComputedVisible": true,
                     "color": {"r": 0, "g": 0, "b": 0, "a": 0.5}},
                    {"id": 3, "name": "OffscreenBuffer", "parent": -1, "zOrderPath": [1],
                     "layerStack": 0,
                     "screenBounds": {"left": 5000, "top": 5000, "right": 6000, "bottom": 6000},
                     "isComputedVisible": false},
                    {"id": 4, "name": "StatusBar", "parent": -1, "zOrderPath": [2],
                     "layerStack": 0, "occludedBy": [2],
                     "screenBounds": {"left": 0, "top": 0, "right": 1080, "bottom": 120},
                     "isComputedVisible": false}
                ]
            },
            {"elapsedNs": 200, "displays": [], "layers": []}
        ]
    }"#;
    let mut data = b"\x09LYRTRACE".to_vec();
    data.extend_from_slice(json.as_bytes());
    data
}

#[test]
fn compositor_trace_end_to_end() {
    let data = layers_buffer();
    let parser = detect_parser(&data).expect("buffer should be detected as a layers trace");
    assert_eq!(parser.trace_type(), TraceType::SurfaceFlinger);

    // Parser contract: one timestamp per entry, non-decreasing, REAL
    // domain because the session offset is present.
    let timestamps = parser.timestamps();
    assert_eq!(timestamps.len(), parser.entries().len());
    assert_eq!(timestamps.len(), 2);
    assert!(timestamps.iter().all(|t| t.domain() == ClockDomain::Real));
    assert_eq!(timestamps[0].value_ns(), 1_000_100);
    assert!(timestamps.windows(2).all(|w| w[0].value_ns() <= w[1].value_ns()));

    let TraceEntry::Layers(snapshot) = parser.entry(timestamps[0]).expect("entry exists") else {
        panic!("expected a layers snapshot");
    };

    // Tree: nesting follows declared parents, not payload order.
    let mut root = from_layers_snapshot(snapshot);
    assert_eq!(root.children().len(), 3);
    assert_eq!(root.children()[0].id(), "1 Wallpaper");
    assert_eq!(root.children()[0].children()[0].id(), "2 App");

    let rects = RectsComputation::new();
    let visibility = VisibilityReasonsComputation::new();
    run_pipeline(&[&rects as &dyn Computation, &visibility], &mut root);

    // Display rect on the root, separate numbering space.
    assert_eq!(root.rects().len(), 1);
    let display = &root.rects()[0];
    assert_eq!(display.id, "Display - 1");
    assert_eq!(display.name, "Built-in Screen");
    assert!(display.is_display);
    assert!(!display.is_visible);
    assert_eq!(display.depth, 0);

    // Layer rects: the offscreen buffer is suppressed; the remaining
    // three get dense depths in z order.
    let mut layer_rects = Vec::new();
    for child in root.children() {
        child.for_each_dfs(&mut |node| layer_rects.extend(node.rects().iter().cloned()));
    }
    assert_eq!(layer_rects.len(), 3);

    let wallpaper = &layer_rects[0];
    assert_eq!(wallpaper.id, "1 Wallpaper");
    assert_eq!(wallpaper.depth, 0);
    assert_eq!(wallpaper.opacity, Some(1.0));

    let app = &layer_rects[1];
    assert_eq!(app.id, "2 App");
    assert_eq!(app.depth, 1);
    assert_eq!(app.opacity, Some(0.5));

    let status_bar = &layer_rects[2];
    assert_eq!(status_bar.id, "4 StatusBar");
    assert_eq!(status_bar.depth, 2);
    assert!(!status_bar.is_visible);
    assert_eq!(status_bar.opacity, Some(0.0));

    // Occlusion is surfaced, not used to drop the rect.
    let status_node = root.find("4 StatusBar").expect("status bar node");
    assert_eq!(status_node.properties.occluded_by, [2]);
    assert_eq!(status_node.visibility_reasons(), ["occluded by 2"]);

    // The empty second snapshot still decoded to an entry.
    let TraceEntry::Layers(empty) = parser.entry(timestamps[1]).expect("entry exists") else {
        panic!("expected a layers snapshot");
    };
    assert!(empty.layers.is_empty());
}

#[test]
fn protolog_trace_is_detected_independently() {
    let json = r#"{"messages": [{"elapsedNs": 5, "text": "hello", "tag": "WindowManager"}]}"#;
    let mut data = b"\x09PROTOLOG".to_vec();
    data.extend_from_slice(json.as_bytes());

    let parser = detect_parser(&data).expect("protolog buffer should be detected");
    assert_eq!(parser.trace_type(), TraceType::ProtoLog);
    assert_eq!(parser.timestamps()[0].domain(), ClockDomain::Elapsed);
}

#[test]
fn corrupt_buffer_fails_without_affecting_other_traces() {
    let mut corrupt = b"\x09LYRTRACE".to_vec();
    corrupt.extend_from_slice(b"{not json");
    let err = detect_parser(&corrupt).expect_err("corrupt payload should fail");
    assert!(matches!(err, ParseError::Decode { .. }));

    // A decode failure in one buffer leaves others fully usable.
    let parser = detect_parser(&layers_buffer()).expect("valid buffer still parses");
    assert_eq!(parser.timestamps().len(), 2);
}
