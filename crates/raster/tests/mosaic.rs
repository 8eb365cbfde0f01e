//! Merging tile outputs into one raster.
#![cfg(feature = "gdal")]

use std::fs;
use std::path::{Path, PathBuf};

use cusum_raster::{
    BlockSink, BlockWindow, GdalStack, GeoReference, MosaicMerger, OUTPUT_BANDS, StackSource,
    TileOutput,
};
use ndarray::Array3;

fn write_tile(path: &Path, georef: &GeoReference, values: &Array3<f32>) -> PathBuf {
    let (_, height, width) = values.dim();
    let mut output = TileOutput::create_with_block_size(path, width, height, georef, 16).unwrap();
    output
        .write_window(&BlockWindow::new(0, 0, width, height), values.view())
        .unwrap();
    output.finish().unwrap();
    path.to_path_buf()
}

fn read_all(path: &Path) -> Array3<f32> {
    let stack = GdalStack::open(path).unwrap();
    let (width, height) = stack.size();
    stack
        .read_window(&BlockWindow::new(0, 0, width, height), &[0, 1, 2])
        .unwrap()
}

#[test]
fn non_overlapping_tiles_merge_without_loss() {
    let dir = tempfile::tempdir().unwrap();
    let left_values = Array3::from_shape_fn((3, 4, 4), |(b, r, c)| {
        if r == c { 0.0 } else { (b + 1) as f32 * 10.0 + (r * 4 + c) as f32 }
    });
    let right_values = Array3::from_shape_fn((3, 4, 4), |(b, r, c)| {
        (b + 1) as f32 * 100.0 + (r * 4 + c) as f32
    });
    let left = write_tile(
        &dir.path().join("t_left.tif"),
        &GeoReference::north_up(0.0, 40.0, 10.0),
        &left_values,
    );
    let right = write_tile(
        &dir.path().join("t_right.tif"),
        &GeoReference::north_up(40.0, 40.0, 10.0),
        &right_values,
    );

    let output = dir.path().join("merged.tif");
    let summary = MosaicMerger::new(&output)
        .with_block_size(16)
        .merge(&[left.clone(), right.clone()])
        .unwrap();
    assert_eq!(summary.size, (8, 4));
    assert_eq!(summary.n_inputs, 2);

    let merged = read_all(&output);
    for b in 0..3 {
        for r in 0..4 {
            for c in 0..4 {
                assert_eq!(merged[[b, r, c]], left_values[[b, r, c]]);
                assert_eq!(merged[[b, r, c + 4]], right_values[[b, r, c]]);
            }
        }
    }

    assert!(!left.exists());
    assert!(!right.exists());
    assert!(!dir.path().join("merged.vrt").exists());
}

#[test]
fn zero_pixel_does_not_mask_valid_pixel() {
    let dir = tempfile::tempdir().unwrap();
    let georef = GeoReference::north_up(0.0, 20.0, 10.0);
    let mut a_values = Array3::<f32>::zeros((3, 2, 2));
    a_values[[0, 0, 0]] = 2019.25;
    a_values[[1, 0, 0]] = 0.8;
    a_values[[2, 0, 0]] = 3.5;
    let b_values = Array3::<f32>::zeros((3, 2, 2));

    // B is listed last so it would win wherever it had data.
    let a = write_tile(&dir.path().join("a.tif"), &georef, &a_values);
    let b = write_tile(&dir.path().join("b.tif"), &georef, &b_values);

    let output = dir.path().join("merged.tif");
    MosaicMerger::new(&output)
        .with_block_size(16)
        .merge(&[a, b])
        .unwrap();

    let merged = read_all(&output);
    assert_eq!(merged, a_values);
}

#[test]
fn merged_raster_carries_band_names() {
    let dir = tempfile::tempdir().unwrap();
    let tile = write_tile(
        &dir.path().join("only.tif"),
        &GeoReference::north_up(0.0, 10.0, 10.0),
        &Array3::<f32>::ones((3, 1, 1)),
    );
    let output = dir.path().join("merged.tif");
    MosaicMerger::new(&output)
        .with_block_size(16)
        .with_keep_intermediates(true)
        .merge(&[tile.clone()])
        .unwrap();

    let stack = GdalStack::open(&output).unwrap();
    assert_eq!(stack.band_labels().unwrap(), OUTPUT_BANDS.to_vec());
    assert!(tile.exists());
}

#[test]
fn failed_materialization_keeps_intermediates() {
    let dir = tempfile::tempdir().unwrap();
    let tile = write_tile(
        &dir.path().join("0_tile0.tif"),
        &GeoReference::north_up(0.0, 10.0, 10.0),
        &Array3::<f32>::ones((3, 1, 1)),
    );
    // The virtual mosaic builds next to it, but no GeoTIFF can be created
    // where a directory already sits.
    let output = dir.path().join("merged.tif");
    fs::create_dir(&output).unwrap();

    let merger = MosaicMerger::new(&output).with_block_size(16);
    assert!(merger.merge(&[tile.clone()]).is_err());
    assert!(tile.exists());
    assert!(merger.vrt_path().exists());
}
