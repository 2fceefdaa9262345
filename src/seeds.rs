//! Seed management for texture noise
//!
//! Every tile gets its own seed derived from a master seed and the tile's name, so a
//! tile's grain does not shift when other tiles are added to or removed from the catalog.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeds for per-tile texture synthesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSeeds {
    /// Master seed (reported so an unseeded run can be repeated)
    pub master: u64,
}

impl TileSeeds {
    pub fn from_master(master: u64) -> Self {
        Self { master }
    }

    pub fn seed_for(&self, tile: &str) -> u64 {
        derive_seed(self.master, tile)
    }

    /// Fresh noise source for one tile.
    pub fn rng_for(&self, tile: &str) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed_for(tile))
    }
}

impl Default for TileSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Derive a sub-seed from a master seed and a tile name.
///
/// Fixed SplitMix64 mixing over the name bytes, so a seed means the same sheet on
/// every build.
fn derive_seed(master: u64, tile: &str) -> u64 {
    tile.bytes()
        .fold(splitmix64(master), |state, byte| splitmix64(state ^ u64::from(byte)))
}

fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
