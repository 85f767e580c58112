//! Synthetic density grid: a seeded cloud around (3, 3) turned into a 40x40
//! KDE surface ready for a contour plot.
//!
//! Writes `density_plotting_2d.csv` (columns `x,y,density`) to the current
//! directory. No feature flags are required.
//!
//! Run with: `cargo run --example density_plotting_2d`

use std::fs::File;
use std::io::BufWriter;

use kde_contour::prelude::*;

fn main() -> Result<()> {
    // 200 points, center 3, spread 0.3, seed 42, padding 0.2, 40x40, bandwidth 0.15
    let config = DensityConfig::default();
    let field = synthetic_field(&config)?;

    let (px, py) = field.peak();
    let (x0, x1) = field.grid().x_bounds();
    let (y0, y1) = field.grid().y_bounds();
    println!("Synthetic cloud: {} points", field.n_points());
    println!("  grid  = [{x0:.3}, {x1:.3}] x [{y0:.3}, {y1:.3}]");
    println!("  peak  = {:.4} at ({px:.3}, {py:.3})", field.density().max());
    println!("  mass  = {:.4}", field.density().mass(field.grid()));

    let levels = field.density().contour_levels(6);
    println!("  contour levels: {levels:.4?}");

    let path = "density_plotting_2d.csv";
    let file = File::create(path).map_err(|e| Error::from_io(path, e))?;
    field
        .to_csv(BufWriter::new(file))
        .map_err(|e| Error::from_io(path, e))?;
    println!("Wrote {path}");
    Ok(())
}
