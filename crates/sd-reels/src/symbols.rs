//! Symbols and the circular strip that carries them

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Stable identity of a symbol within its strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

/// One tile on a reel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    /// Index into the machine's texture set
    pub texture: usize,
    /// Horizontal position relative to the reel origin
    pub x: f64,
}

/// Fixed-length row of symbols that scrolls left and wraps around.
///
/// Recycled symbols keep their id and get a fresh random texture.
#[derive(Debug, Clone)]
pub struct SymbolStrip {
    symbols: Vec<Symbol>,
    symbol_size: f64,
    texture_count: usize,
}

impl SymbolStrip {
    /// `len` symbols at `0, size, 2*size, ...` with random textures
    pub fn new<R: Rng + ?Sized>(
        len: usize,
        symbol_size: f64,
        texture_count: usize,
        rng: &mut R,
    ) -> Self {
        let texture_count = texture_count.max(1);
        let symbols = (0..len)
            .map(|i| Symbol {
                id: SymbolId(i as u32),
                texture: rng.random_range(0..texture_count),
                x: i as f64 * symbol_size,
            })
            .collect();
        Self {
            symbols,
            symbol_size,
            texture_count,
        }
    }

    #[inline]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[inline]
    pub fn symbol_size(&self) -> f64 {
        self.symbol_size
    }

    pub fn texture_count(&self) -> usize {
        self.texture_count
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    /// Move every symbol by `dx`
    pub fn shift(&mut self, dx: f64) {
        for symbol in &mut self.symbols {
            symbol.x += dx;
        }
    }

    pub fn rightmost_x(&self) -> f64 {
        self.symbols
            .iter()
            .map(|s| s.x)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Move every symbol that left the window (`x + size < 0`) to the right
    /// of the current rightmost one, with a new random texture.
    ///
    /// Returns the ids that were recycled.
    pub fn recycle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<SymbolId> {
        let mut recycled = Vec::new();
        for i in 0..self.symbols.len() {
            if self.symbols[i].x + self.symbol_size < 0.0 {
                let x = self.rightmost_x() + self.symbol_size;
                let symbol = &mut self.symbols[i];
                symbol.x = x;
                symbol.texture = rng.random_range(0..self.texture_count);
                recycled.push(symbol.id);
            }
        }
        recycled
    }

    /// Reorder storage left to right
    pub fn sort_by_x(&mut self) {
        self.symbols.sort_by(|a, b| a.x.total_cmp(&b.x));
    }

    /// Grid slot `i * size` for the i-th symbol in storage order
    pub fn grid_x(&self, i: usize) -> f64 {
        i as f64 * self.symbol_size
    }

    pub(crate) fn set_x(&mut self, i: usize, x: f64) {
        if let Some(symbol) = self.symbols.get_mut(i) {
            symbol.x = x;
        }
    }

    /// True when symbols sit exactly on `0, size, 2*size, ...` in storage order
    pub fn is_aligned(&self) -> bool {
        self.symbols
            .iter()
            .enumerate()
            .all(|(i, s)| (s.x - self.grid_x(i)).abs() < 1e-9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_new_strip_is_aligned() {
        let mut rng = StdRng::seed_from_u64(1);
        let strip = SymbolStrip::new(7, 150.0, 5, &mut rng);
        assert_eq!(strip.len(), 7);
        assert!(strip.is_aligned());
        assert!(strip.symbols().iter().all(|s| s.texture < 5));
        assert_eq!(strip.rightmost_x(), 900.0);
    }

    #[test]
    fn test_recycle_moves_to_rightmost_plus_size() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut strip = SymbolStrip::new(7, 150.0, 5, &mut rng);
        strip.shift(-160.0);
        let right_before = strip.rightmost_x();

        let recycled = strip.recycle(&mut rng);

        assert_eq!(recycled, vec![SymbolId(0)]);
        let moved = strip.get(SymbolId(0)).unwrap();
        assert_eq!(moved.x, right_before + 150.0);
        assert!(moved.texture < 5);
        assert_eq!(strip.len(), 7);
    }

    #[test]
    fn test_symbol_on_boundary_is_kept() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut strip = SymbolStrip::new(3, 100.0, 5, &mut rng);
        strip.shift(-100.0);
        assert!(strip.recycle(&mut rng).is_empty());
    }

    #[test]
    fn test_sort_by_x() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut strip = SymbolStrip::new(3, 100.0, 5, &mut rng);
        strip.shift(-150.0);
        strip.recycle(&mut rng);
        strip.sort_by_x();
        let xs: Vec<f64> = strip.symbols().iter().map(|s| s.x).collect();
        assert_eq!(xs, vec![-50.0, 50.0, 150.0]);
        assert_eq!(strip.symbols()[2].id, SymbolId(0));
    }
}
