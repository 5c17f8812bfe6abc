//! This example triangulates a polygonal geometry given as WKT and prints the resulting TIN.
//!
//! The geometry is read from the file given as the first argument, or from the standard input if no argument is
//! given. The second, optional argument is the number of decimals in the output.
//!
//! ```shell
//! echo "POLYGON((0 0,4 0,4 4,0 4,0 0),(1 1,1 3,3 3,3 1,1 1))" | cargo run --example triangulate
//! ```

use std::io::Read;

use anyhow::{anyhow, Result};
use tessera::area::{area_2d, area_3d};
use tessera::triangulate::triangulate_polygon_3d;
use tessera_types::{read_wkt, Geometry, GeometryType};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let text = match args.next() {
        Some(file_name) => std::fs::read_to_string(file_name)?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    let decimals = args.next().map(|d| d.parse::<usize>()).transpose()?;

    let geometry = read_wkt(text.trim())?;
    if geometry.dimension() < 2 {
        return Err(anyhow!(
            "{} has no area to triangulate",
            geometry.geometry_type()
        ));
    }

    let tin = triangulate_polygon_3d(&geometry)?;
    log::info!(
        "{} triangulated into {} triangles",
        geometry.geometry_type(),
        tin.num_triangles()
    );
    log::info!(
        "Area: {} in xy plane, {} in 3d",
        area_2d(&geometry),
        area_3d(&geometry)?
    );

    println!("{}", Geometry::from(tin).as_text(decimals));
    Ok(())
}
