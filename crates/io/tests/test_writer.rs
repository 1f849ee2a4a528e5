//! Integration test: map files written by `write_map` load back as grids.

use gwpm_io::{IndexLayer, IoError, LoaderConfig, MapFile, MapLayer, load_grid, write_map};
use ndarray::array;
use tempfile::tempdir;

fn map() -> MapFile {
    MapFile {
        lats: vec![38.0, 39.0],
        lons: vec![69.0, 70.0, 71.0],
        layers: vec![MapLayer {
            name: "rmse_GEFS".to_string(),
            long_name: "RMSE of GEFS".to_string(),
            units: Some("K".to_string()),
            values: array![[1.0, 2.0, f64::NAN], [0.5, 0.25, 3.0]],
        }],
        index: Some(IndexLayer {
            name: "best_source".to_string(),
            long_name: "lowest-RMSE source".to_string(),
            labels: vec!["GEFS".to_string(), "ICON".to_string()],
            values: array![[0, 1, -1], [1, 0, 0]],
        }),
        attributes: vec![("parameter".to_string(), "Temp".to_string())],
    }
}

#[test]
fn write_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("map.nc");
    write_map(&path, &map()).unwrap();

    let grid = load_grid(&path, "rmse_GEFS", &LoaderConfig::default()).unwrap();
    assert_eq!(grid.shape(), vec![2, 3]);
    assert_eq!(grid.lons(), [69.0, 70.0, 71.0]);
    assert_eq!(grid.layer(0)[[1, 1]], 0.25);
    assert!(grid.layer(0)[[0, 2]].is_nan());

    // The -1 fill of the index layer decodes to NaN.
    let best = load_grid(&path, "best_source", &LoaderConfig::default()).unwrap();
    assert_eq!(best.layer(0)[[0, 1]], 1.0);
    assert!(best.layer(0)[[0, 2]].is_nan());
}

#[test]
fn shape_mismatch_rejected_before_writing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.nc");
    let mut m = map();
    m.lons.pop();
    let err = write_map(&path, &m).unwrap_err();
    assert!(matches!(err, IoError::ShapeMismatch { .. }));
    assert!(!path.exists());
}
