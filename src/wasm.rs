//! Browser bindings. The canvas front end owns rendering and input; it drives
//! the world through these calls.

use wasm_bindgen::prelude::*;

use crate::block::BlockType;
use crate::grid::Cell;
use crate::rng::JsRandom;
use crate::world::World;

#[wasm_bindgen(js_name = World)]
pub struct WasmWorld {
    inner: World<JsRandom>,
}

#[wasm_bindgen(js_class = World)]
impl WasmWorld {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> WasmWorld {
        WasmWorld {
            inner: World::with_random(width, height, JsRandom),
        }
    }

    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Runs one step and returns how many swaps it made.
    pub fn tick(&mut self) -> u32 {
        self.inner.tick().moves() as u32
    }

    /// Block id at `(x, y)`, or -1 outside the world.
    pub fn get_cell(&self, x: i32, y: i32) -> i32 {
        self.inner
            .get_block(x, y)
            .map_or(-1, |cell| i32::from(cell.kind.id()))
    }

    /// Returns `false` for an unknown id or a position outside the world.
    pub fn set_cell(&mut self, x: i32, y: i32, id: u8) -> bool {
        match BlockType::from_id(id) {
            Some(kind) => self.inner.set_block(x, y, Cell::new(kind)),
            None => false,
        }
    }

    pub fn paint(&mut self, x: i32, y: i32, width: u32, id: u8) -> u32 {
        BlockType::from_id(id).map_or(0, |kind| self.inner.paint(x, y, width, kind) as u32)
    }

    pub fn clear(&mut self) {
        self.inner.initialize();
    }

    /// Block ids in row-major order, bottom row first.
    pub fn kinds(&self) -> Vec<u8> {
        self.inner.grid().cells().map(|cell| cell.kind.id()).collect()
    }
}
