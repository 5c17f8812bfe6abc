//! This example converts an ESRI ASCII grid into a TIN and prints it as WKT.
//!
//! ```shell
//! cargo run --example asc_to_tin -- ./tessera-asc/test-data/small.asc
//! ```

use anyhow::{anyhow, Result};
use tessera::area::{area_2d, area_3d};
use tessera_asc::AscGrid;
use tessera_types::Geometry;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(file_name) = std::env::args().nth(1) else {
        return Err(anyhow!(
            "This example must be run with one argument - name of the .asc file to load"
        ));
    };

    let grid = AscGrid::open(&file_name)?;
    let tin = Geometry::from(grid.to_triangulated_surface());
    log::info!(
        "{file_name}: {}x{} cells, surface area {} ({} in xy plane)",
        grid.cols(),
        grid.rows(),
        area_3d(&tin)?,
        area_2d(&tin)
    );

    println!("{tin}");
    Ok(())
}
