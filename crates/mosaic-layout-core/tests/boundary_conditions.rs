use mosaic_layout_core::config::MosaicConfig;
use mosaic_layout_core::error::MosaicError;
use mosaic_layout_core::model::ItemSize;
use mosaic_layout_core::planner::compute_placements;

#[test]
fn zero_canvas_width_is_rejected() {
    let cfg = MosaicConfig {
        canvas_width: 0.0,
        ..Default::default()
    };
    match cfg.validate() {
        Err(MosaicError::InvalidDimensions { width, height }) => {
            assert_eq!(width, 0.0);
            assert_eq!(height, 768.0);
        }
        other => panic!("expected InvalidDimensions, got {:?}", other),
    }
}

#[test]
fn non_finite_canvas_is_rejected() {
    let cfg = MosaicConfig {
        canvas_height: f64::NAN,
        ..Default::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn zero_columns_are_rejected() {
    let cfg = MosaicConfig {
        columns: 0,
        ..Default::default()
    };
    match cfg.validate() {
        Err(MosaicError::InvalidConfig(msg)) => assert!(msg.contains("column")),
        other => panic!("expected InvalidConfig, got {:?}", other),
    }
}

#[test]
fn negative_spacing_is_rejected() {
    let cfg = MosaicConfig {
        spacing: -1.0,
        ..Default::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn spacing_that_swallows_the_canvas_is_rejected() {
    let cfg = MosaicConfig {
        canvas_width: 100.0,
        canvas_height: 100.0,
        columns: 4,
        rows: 4,
        spacing: 30.0,
        ..Default::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn planner_propagates_validation_errors() {
    let cfg = MosaicConfig {
        columns: 0,
        ..Default::default()
    };
    let items = vec![ItemSize::new(100.0, 100.0)];
    assert!(compute_placements(&items, &cfg).is_err());
}

#[test]
fn empty_item_list_yields_empty_mapping() {
    let cfg = MosaicConfig::default();
    let layout = compute_placements(&[], &cfg).unwrap();
    assert!(layout.frames.is_empty());
    let stats = layout.stats();
    assert_eq!(stats.num_items, 0);
    assert_eq!(stats.num_placed, 0);
    assert_eq!(stats.coverage, 0.0);
}

#[test]
fn degenerate_item_still_receives_a_frame() {
    let cfg = MosaicConfig::builder()
        .with_canvas(900.0, 900.0)
        .with_grid(3, 3)
        .spacing(0.0)
        .build();
    let layout = compute_placements(&[ItemSize::new(0.0, 0.0)], &cfg).unwrap();
    // Clamped to a single block, never an error.
    let rect = layout.frames.get(&0).expect("degenerate item placed");
    assert_eq!((rect.w, rect.h), (300.0, 300.0));
}

#[test]
fn dropped_indices_are_absent_not_zero_sized() {
    let cfg = MosaicConfig::builder()
        .with_canvas(900.0, 900.0)
        .with_grid(3, 3)
        .spacing(0.0)
        .build();
    let items: Vec<ItemSize> = (0..10).map(|_| ItemSize::new(400.0, 400.0)).collect();
    let layout = compute_placements(&items, &cfg).unwrap();

    assert_eq!(layout.frames.len(), 9);
    for index in 0..9 {
        assert!(layout.frames.contains_key(&index));
    }
    assert!(!layout.frames.contains_key(&9));
    assert_eq!(layout.stats().num_dropped, 1);
}

#[test]
fn default_config_is_valid() {
    assert!(MosaicConfig::default().validate().is_ok());
}
