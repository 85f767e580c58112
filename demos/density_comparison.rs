//! Compare two JWST broad-line AGN catalogs in the Eddington ratio vs.
//! extinction plane, with an optional model curve read from
//! `eddington_ratios.txt` and `extinctions.txt`.
//!
//! The overlay directory defaults to the current directory and can be passed
//! as the first argument. Missing overlay files only produce a warning.
//!
//! Run with: `cargo run --example density_comparison [overlay_dir]`

use kde_contour::prelude::*;

fn main() -> Result<()> {
    let overlay_dir = std::env::args().nth(1).unwrap_or_else(|| ".".to_owned());

    let datasets = [
        Dataset::from_catalog(&MAIOLINO_2023)?,
        Dataset::from_catalog(&HARIKANE_2023)?,
    ];
    let overlay = OverlaySource::in_dir(&overlay_dir);
    // Padding 0.5, 100x100 grid, Scott bandwidth, display limits (-3, 1)
    let config = DensityConfig::catalog_comparison();

    let comparison = compare(&datasets, Some(&overlay), &config, FramePolicy::PerDataset)?;

    for warning in comparison.warnings() {
        eprintln!("warning: {warning}");
    }

    for field in comparison.fields() {
        let (px, py) = field.peak();
        println!(
            "{:<14} n={:<3} factor={:.3} peak at log f_Edd={px:.2}, log E(B-V)={py:.2}",
            field.label(),
            field.n_points(),
            field.factor().unwrap_or(f64::NAN),
        );
    }

    match comparison.overlay() {
        Some(curve) => println!("Overlay curve: {} vertices", curve.len()),
        None => println!("Overlay curve: not available"),
    }
    if let Some((lo, hi)) = comparison.xlim() {
        println!("Display x-limits: ({lo}, {hi})");
    }
    Ok(())
}
