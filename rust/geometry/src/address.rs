// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validated chamber position within CMS.

use std::fmt;

use crate::error::{Error, Result};

pub const WHEEL_RANGE: (i32, i32) = (-2, 2);
pub const SECTOR_RANGE: (i32, i32) = (1, 14);
pub const STATION_RANGE: (i32, i32) = (1, 4);

/// Sectors of wheel 0 whose chambers face the -z side.
const WHEEL_ZERO_NEGATIVE_SECTORS: [i32; 7] = [1, 4, 5, 8, 9, 12, 13];

/// Position of a chamber: wheel, sector and station type (MB1..MB4).
///
/// A `ChamberAddress` can only be built through [`ChamberAddress::new`], so
/// holding one means the three values are in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChamberAddress {
    wheel: i32,
    sector: i32,
    station: i32,
}

impl ChamberAddress {
    /// Validates and creates an address.
    ///
    /// Wheel must be in `[-2, 2]`, sector in `[1, 14]` and station in `[1, 4]`.
    pub fn new(wheel: i32, sector: i32, station: i32) -> Result<Self> {
        check_range("Wheel", wheel, WHEEL_RANGE)?;
        check_range("Sector", sector, SECTOR_RANGE)?;
        check_range("Station", station, STATION_RANGE)?;
        Ok(Self {
            wheel,
            sector,
            station,
        })
    }

    #[inline]
    pub fn wheel(&self) -> i32 {
        self.wheel
    }

    #[inline]
    pub fn sector(&self) -> i32 {
        self.sector
    }

    #[inline]
    pub fn station(&self) -> i32 {
        self.station
    }

    /// Name in the form `"Wheel {wheel}, Sector {sector}, Station {station}"`.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Sign of the chamber face along the CMS z axis.
    ///
    /// Negative wheels face -z, positive wheels face +z. Wheel 0 alternates by
    /// sector.
    pub fn face_orientation(&self) -> f64 {
        if self.wheel < 0 {
            -1.0
        } else if self.wheel > 0 {
            1.0
        } else if WHEEL_ZERO_NEGATIVE_SECTORS.contains(&self.sector) {
            -1.0
        } else {
            1.0
        }
    }

    /// Every valid address, wheel-major.
    pub fn all() -> impl Iterator<Item = ChamberAddress> {
        (WHEEL_RANGE.0..=WHEEL_RANGE.1).flat_map(|wheel| {
            (SECTOR_RANGE.0..=SECTOR_RANGE.1).flat_map(move |sector| {
                (STATION_RANGE.0..=STATION_RANGE.1).map(move |station| ChamberAddress {
                    wheel,
                    sector,
                    station,
                })
            })
        })
    }
}

impl fmt::Display for ChamberAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wheel {}, Sector {}, Station {}",
            self.wheel, self.sector, self.station
        )
    }
}

fn check_range(field: &'static str, value: i32, (min, max): (i32, i32)) -> Result<()> {
    if value < min || value > max {
        return Err(Error::InvalidConfiguration {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
