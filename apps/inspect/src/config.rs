// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inspector configuration loaded from environment variables.

/// Inspector configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the geometry table JSON file.
    pub geometry_path: String,
    /// Number of cells printed per layer (first and last ones).
    pub print_cells: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            geometry_path: std::env::var("DT_GEOMETRY").unwrap_or_else(|_| "dt_geometry.json".into()),
            print_cells: std::env::var("DT_PRINT_CELLS")
                .unwrap_or_else(|_| "2".into())
                .parse()
                .unwrap_or(2),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
