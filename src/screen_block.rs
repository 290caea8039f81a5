use std::num::NonZeroU32;

use itertools::iproduct;
use ordered_float::OrderedFloat;

use crate::geometry::{ScreenBlock, ScreenPoint, ScreenSize};

pub trait ScreenBlockExt {
    /// Block covering the whole screen of the given size.
    fn from_size(size: ScreenSize) -> Self;

    /// Pixels inside the block, row by row.
    fn internal_points(&self) -> impl Iterator<Item = ScreenPoint>;

    /// Splits the block into tiles of at most `tile_size` pixels per side,
    /// ordered from the middle of the block outwards.
    fn tile_ordering(&self, tile_size: NonZeroU32) -> Vec<ScreenBlock>;
}

impl ScreenBlockExt for ScreenBlock {
    fn from_size(size: ScreenSize) -> Self {
        ScreenBlock::new(ScreenPoint::origin(), ScreenPoint::from(size))
    }

    fn internal_points(&self) -> impl Iterator<Item = ScreenPoint> {
        iproduct!(self.min.y..self.max.y, self.min.x..self.max.x).map(|(y, x)| ScreenPoint::new(x, y))
    }

    fn tile_ordering(&self, tile_size: NonZeroU32) -> Vec<ScreenBlock> {
        let tile_size = tile_size.get();
        let xs = (self.min.x..self.max.x).step_by(tile_size as usize);
        let ys = (self.min.y..self.max.y).step_by(tile_size as usize);

        let mut tiles: Vec<_> = iproduct!(ys, xs)
            .map(|(y, x)| {
                ScreenBlock::new(
                    ScreenPoint::new(x, y),
                    ScreenPoint::new(
                        (x + tile_size).min(self.max.x),
                        (y + tile_size).min(self.max.y),
                    ),
                )
            })
            .collect();

        let center = block_center(self);
        tiles.sort_by_key(|tile| {
            let tile_center = block_center(tile);
            OrderedFloat((tile_center - center).norm_squared())
        });
        tiles
    }
}

fn block_center(block: &ScreenBlock) -> nalgebra::Point2<f64> {
    nalgebra::center(&block.min.cast::<f64>(), &block.max.cast::<f64>())
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;
    use test_case::test_case;

    #[test]
    fn internal_points_row_by_row() {
        let block = ScreenBlock::new(ScreenPoint::new(1, 5), ScreenPoint::new(3, 7));
        let points: Vec<_> = block.internal_points().collect();
        assert!(
            points
                == vec![
                    ScreenPoint::new(1, 5),
                    ScreenPoint::new(2, 5),
                    ScreenPoint::new(1, 6),
                    ScreenPoint::new(2, 6),
                ]
        );
    }

    #[test]
    fn empty_block_has_no_points() {
        let block = ScreenBlock::new(ScreenPoint::new(3, 3), ScreenPoint::new(3, 10));
        assert!(block.internal_points().count() == 0);
    }

    #[test_case(ScreenSize::new(100, 100), 10, 100 ; "even_split")]
    #[test_case(ScreenSize::new(101, 35), 16, 21 ; "clipped_edges")]
    #[test_case(ScreenSize::new(5, 5), 64, 1 ; "single_tile")]
    fn tiles_cover_every_pixel_once(size: ScreenSize, tile_size: u32, tile_count: usize) {
        let block = ScreenBlock::from_size(size);
        let tiles = block.tile_ordering(NonZeroU32::new(tile_size).unwrap());
        assert!(tiles.len() == tile_count);

        let mut covered: Vec<_> = tiles.iter().flat_map(|tile| tile.internal_points()).collect();
        covered.sort_by_key(|p| (p.y, p.x));
        let expected: Vec<_> = block.internal_points().collect();
        assert!(covered == expected);
    }

    #[test]
    fn tiles_start_in_the_middle() {
        let block = ScreenBlock::from_size(ScreenSize::new(30, 30));
        let tiles = block.tile_ordering(NonZeroU32::new(10).unwrap());
        assert!(tiles[0] == ScreenBlock::new(ScreenPoint::new(10, 10), ScreenPoint::new(20, 20)));
    }
}
