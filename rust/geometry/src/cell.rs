// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Drift cells, the leaves of a station tree.

use std::fmt;

use dt_lite_core::{ChildKind, GeometrySource, RawId};

use crate::attributes::{AttrValue, Attributes};
use crate::error::Result;
use crate::frame::DtFrame;

/// A drift cell, identified by super layer, layer and wire number.
///
/// Besides its pose a cell carries caller-supplied attributes (drift time,
/// hit size, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    frame: DtFrame,
    super_layer: i32,
    layer: i32,
    attributes: Attributes,
}

impl Cell {
    pub(crate) fn build<S: GeometrySource + ?Sized>(
        source: &S,
        id: RawId,
        super_layer: i32,
        layer: i32,
    ) -> Result<Self> {
        let wire = source.number(id, ChildKind::Cell)?;
        Ok(Self {
            frame: DtFrame::from_source(source, id, wire)?,
            super_layer,
            layer,
            attributes: Attributes::new(),
        })
    }

    pub fn frame(&self) -> &DtFrame {
        &self.frame
    }

    /// Wire number.
    pub fn number(&self) -> i32 {
        self.frame.number()
    }

    pub fn wire(&self) -> i32 {
        self.frame.number()
    }

    pub fn super_layer_number(&self) -> i32 {
        self.super_layer
    }

    pub fn layer_number(&self) -> i32 {
        self.layer
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// Sets an attribute, returning the previous value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Option<AttrValue> {
        self.attributes.insert(name.into(), value.into())
    }
}

impl AsRef<DtFrame> for Cell {
    fn as_ref(&self) -> &DtFrame {
        &self.frame
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell {}: {}", self.wire(), self.frame)
    }
}
