//! Ordered pixel storage filled in by the scanline workers.
//!
//! Slots start out `None` and each is written exactly once. Rows are handed
//! out as disjoint mutable slices, so workers never share a slot.

use crate::{RenderError, Rgb8};
use rayon::prelude::*;
use std::io::Write;

/// Row-major image of encoded pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<Option<Rgb8>>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Get the pixel at (x, y), `None` if it has not been rendered.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb8> {
        self.pixels[y * self.width + x]
    }

    pub fn row(&self, y: usize) -> &[Option<Rgb8>] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub fn pixels(&self) -> &[Option<Rgb8>] {
        &self.pixels
    }

    /// Disjoint rows for parallel writers, top row first.
    pub fn par_rows_mut(&mut self) -> rayon::slice::ChunksMut<'_, Option<Rgb8>> {
        self.pixels.par_chunks_mut(self.width.max(1))
    }

    /// First row that still holds an unwritten slot.
    pub fn first_incomplete_row(&self) -> Option<usize> {
        self.pixels
            .iter()
            .position(Option::is_none)
            .map(|index| index / self.width.max(1))
    }

    pub fn is_complete(&self) -> bool {
        self.first_incomplete_row().is_none()
    }

    /// Write a plain-text `P3` PPM, top-left pixel first.
    ///
    /// Refuses to write anything if a slot was never filled.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> Result<(), RenderError> {
        if let Some(row) = self.first_incomplete_row() {
            return Err(RenderError::IncompleteFramebuffer { row });
        }

        write!(out, "P3\n{} {}\n255\n", self.width, self.height)?;
        for [r, g, b] in self.pixels.iter().flatten() {
            writeln!(out, "{} {} {}", r, g, b)?;
        }
        out.flush()?;
        Ok(())
    }
}
