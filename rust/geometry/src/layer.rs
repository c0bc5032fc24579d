// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

use dt_lite_core::{ChildKind, GeometrySource, RawId};

use crate::cell::Cell;
use crate::error::Result;
use crate::frame::DtFrame;

/// A layer of drift cells inside a super layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    frame: DtFrame,
    super_layer: i32,
    cells: Vec<Cell>,
}

impl Layer {
    pub(crate) fn build<S: GeometrySource + ?Sized>(
        source: &S,
        id: RawId,
        super_layer: i32,
    ) -> Result<Self> {
        let number = source.number(id, ChildKind::Layer)?;
        let frame = DtFrame::from_source(source, id, number)?;
        let cells = source
            .children(id, ChildKind::Cell)?
            .into_iter()
            .map(|cell| Cell::build(source, cell, super_layer, number))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            frame,
            super_layer,
            cells,
        })
    }

    pub fn frame(&self) -> &DtFrame {
        &self.frame
    }

    pub fn number(&self) -> i32 {
        self.frame.number()
    }

    pub fn super_layer_number(&self) -> i32 {
        self.super_layer
    }

    /// Cells in geometry-source order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell with wire number `wire`, if present.
    pub fn cell(&self, wire: i32) -> Option<&Cell> {
        self.cells.iter().find(|c| c.wire() == wire)
    }

    pub fn cell_mut(&mut self, wire: i32) -> Option<&mut Cell> {
        self.cells.iter_mut().find(|c| c.wire() == wire)
    }

    /// Lowest wire number in the layer.
    pub fn first_cell_number(&self) -> Option<i32> {
        self.cells.iter().map(Cell::wire).min()
    }

    /// Highest wire number in the layer.
    pub fn last_cell_number(&self) -> Option<i32> {
        self.cells.iter().map(Cell::wire).max()
    }
}

impl AsRef<DtFrame> for Layer {
    fn as_ref(&self) -> &DtFrame {
        &self.frame
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Layer {}: {}, {} cells",
            self.number(),
            self.frame,
            self.cells.len()
        )
    }
}
