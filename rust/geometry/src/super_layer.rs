// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

use dt_lite_core::{ChildKind, GeometrySource, RawId};

use crate::error::Result;
use crate::frame::DtFrame;
use crate::layer::Layer;

/// A super layer: four layers of cells measuring the same coordinate
/// (super layers 1 and 3 measure phi, super layer 2 measures theta).
#[derive(Debug, Clone, PartialEq)]
pub struct SuperLayer {
    frame: DtFrame,
    layers: Vec<Layer>,
}

impl SuperLayer {
    pub(crate) fn build<S: GeometrySource + ?Sized>(source: &S, id: RawId) -> Result<Self> {
        let number = source.number(id, ChildKind::SuperLayer)?;
        let frame = DtFrame::from_source(source, id, number)?;
        let layers = source
            .children(id, ChildKind::Layer)?
            .into_iter()
            .map(|layer| Layer::build(source, layer, number))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { frame, layers })
    }

    pub fn frame(&self) -> &DtFrame {
        &self.frame
    }

    pub fn number(&self) -> i32 {
        self.frame.number()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer numbered `number`, if present.
    pub fn layer(&self, number: i32) -> Option<&Layer> {
        self.layers.iter().find(|l| l.number() == number)
    }

    pub fn layer_mut(&mut self, number: i32) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.number() == number)
    }
}

impl AsRef<DtFrame> for SuperLayer {
    fn as_ref(&self) -> &DtFrame {
        &self.frame
    }
}

impl fmt::Display for SuperLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuperLayer {}: {}", self.number(), self.frame)
    }
}
