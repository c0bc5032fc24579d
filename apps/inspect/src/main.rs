// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: build a DT station from a geometry table and print its tree.
//!
//! Usage:
//!   dt-inspect --wheel <w> --sector <s> --station <n> [options]
//!
//! Environment:
//!   DT_GEOMETRY     geometry table JSON (overridden by --geometry)
//!   DT_PRINT_CELLS  cells printed at each end of a layer (overridden by --print-cells)
//!   RUST_LOG        tracing filter

use std::fs::{self, File};
use std::io::BufReader;

use anyhow::{bail, Context};
use dt_lite_core::GeometryTable;
use dt_lite_geometry::{CellInfo, Frame, Layer, Station};

mod config;

use config::Config;

struct Args {
    wheel: i32,
    sector: i32,
    station: i32,
    geometry: Option<String>,
    cells: Option<String>,
    print_cells: Option<usize>,
}

fn print_usage() {
    println!("Usage: dt-inspect --wheel <w> --sector <s> --station <n> [options]");
    println!();
    println!("Options:");
    println!("  --geometry <path>   Geometry table JSON (default: $DT_GEOMETRY or dt_geometry.json)");
    println!("  --cells <path>      Drift cell info JSON (record, list of records, or split table)");
    println!("  --print-cells <n>   Cells printed at each end of a layer (default: $DT_PRINT_CELLS or 2)");
    println!("  -h, --help          Show this help");
}

fn parse_args(args: &[String]) -> anyhow::Result<Option<Args>> {
    let mut wheel = None;
    let mut sector = None;
    let mut station = None;
    let mut geometry = None;
    let mut cells = None;
    let mut print_cells = None;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        if flag == "--help" || flag == "-h" {
            return Ok(None);
        }
        let value = args
            .get(i + 1)
            .with_context(|| format!("missing value for {flag}"))?;
        match flag {
            "--wheel" => wheel = Some(value.parse().context("invalid wheel value")?),
            "--sector" => sector = Some(value.parse().context("invalid sector value")?),
            "--station" => station = Some(value.parse().context("invalid station value")?),
            "--geometry" => geometry = Some(value.clone()),
            "--cells" => cells = Some(value.clone()),
            "--print-cells" => print_cells = Some(value.parse().context("invalid print-cells value")?),
            other => bail!("unknown option: {other}"),
        }
        i += 2;
    }

    Ok(Some(Args {
        wheel: wheel.context("--wheel is required")?,
        sector: sector.context("--sector is required")?,
        station: station.context("--station is required")?,
        geometry,
        cells,
        print_cells,
    }))
}

fn print_layer(station: &Station, layer: &Layer, print_cells: usize) -> anyhow::Result<()> {
    println!("\t\t{}", layer);
    let count = layer.cells().len();
    for (i, cell) in layer.cells().iter().enumerate() {
        if i >= print_cells && i + print_cells < count {
            continue;
        }
        let nv = station.position_in(cell, Frame::NaturalViewPhi)?;
        print!(
            "\t\t\t{} | phi view ({:.2}, {:.2}, {:.2})",
            cell, nv.x, nv.y, nv.z
        );
        for (name, value) in cell.attributes() {
            print!(" {name}={value}");
        }
        println!();
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,dt_lite_geometry=debug".into()),
        )
        .init();

    let argv: Vec<String> = std::env::args().collect();
    let Some(args) = parse_args(&argv)? else {
        print_usage();
        return Ok(());
    };

    let config = Config::from_env();
    let geometry_path = args.geometry.unwrap_or(config.geometry_path);
    let print_cells = args.print_cells.unwrap_or(config.print_cells);

    tracing::info!(
        geometry = %geometry_path,
        wheel = args.wheel,
        sector = args.sector,
        station = args.station,
        "Loading geometry table"
    );

    let file = File::open(&geometry_path)
        .with_context(|| format!("cannot open geometry table '{geometry_path}'"))?;
    let table = GeometryTable::from_reader(BufReader::new(file))
        .with_context(|| format!("cannot parse geometry table '{geometry_path}'"))?;
    tracing::info!(
        chambers = table.chamber_count(),
        components = table.len(),
        "Geometry table loaded"
    );

    let mut station = Station::new(&table, args.wheel, args.sector, args.station)?;

    if let Some(cells_path) = &args.cells {
        let json = fs::read_to_string(cells_path)
            .with_context(|| format!("cannot read cell info '{cells_path}'"))?;
        let info = CellInfo::from_json_str(&json)?;
        let report = station.set_cell_attrs(&info)?;
        tracing::info!(
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            "Cell info assigned"
        );
    }

    println!("{}", station);
    let origin = station.position_in(&station, Frame::Cms)?;
    println!(
        "  face orientation {:+}, CMS centre ({:.2}, {:.2}, {:.2})",
        station.face_orientation(),
        origin.x,
        origin.y,
        origin.z
    );

    for sl in station.super_layers() {
        let local = station.position_in(sl, Frame::Station)?;
        println!(
            "\t{} | station frame ({:.2}, {:.2}, {:.2})",
            sl, local.x, local.y, local.z
        );
        for layer in sl.layers() {
            print_layer(&station, layer, print_cells)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("dt-inspect")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn parses_required_flags() {
        let args = parse_args(&argv(&["--wheel", "-2", "--sector", "1", "--station", "2"]))
            .unwrap()
            .unwrap();
        assert_eq!((args.wheel, args.sector, args.station), (-2, 1, 2));
        assert!(args.geometry.is_none());
        assert!(args.cells.is_none());
        assert!(args.print_cells.is_none());
    }

    #[test]
    fn optional_flags_override_environment() {
        let args = parse_args(&argv(&[
            "--wheel", "1", "--sector", "13", "--station", "4",
            "--geometry", "barrel.json", "--cells", "hits.json", "--print-cells", "5",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(args.geometry.as_deref(), Some("barrel.json"));
        assert_eq!(args.cells.as_deref(), Some("hits.json"));
        assert_eq!(args.print_cells, Some(5));
    }

    #[test]
    fn help_short_circuits() {
        assert!(parse_args(&argv(&["--wheel", "0", "-h"])).unwrap().is_none());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(&argv(&["--wheel", "0", "--sector", "1"])).is_err());
        assert!(parse_args(&argv(&["--wheel", "x", "--sector", "1", "--station", "1"])).is_err());
        assert!(parse_args(&argv(&["--bogus", "1"])).is_err());
        assert!(parse_args(&argv(&["--wheel"])).is_err());
        assert!(parse_args(&argv(&["--wheel", "0", "--sector", "1", "--station", "1", "--print-cells", "-1"])).is_err());
    }
}
