//! Envelope-keyed spatial indices.
//!
//! Both back ends are built in one go from a full entry list and are
//! read-only afterwards. Queries return a conservative superset of the
//! entries whose envelope intersects the query; callers re-check geometry.

use geo::Rect;
use hashbrown::HashMap;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{AABB, RTree};

use super::config::{IndexKind, StreetIndexConfig};

pub trait SpatialIndex<T>: Send + Sync {
    /// Items whose envelope may intersect `envelope`, sorted and deduplicated
    fn query(&self, envelope: &Rect<f64>) -> Vec<T>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds the back end selected in `config`
pub fn build_index<T>(entries: Vec<(Rect<f64>, T)>, config: &StreetIndexConfig) -> Box<dyn SpatialIndex<T>>
where
    T: Copy + Ord + Send + Sync + 'static,
{
    match config.kind {
        IndexKind::RTree => Box::new(RTreeIndex::bulk_load(entries)),
        IndexKind::HashGrid => Box::new(HashGridIndex::build(entries, config.grid_cell_size)),
    }
}

type RTreeItem<T> = GeomWithData<Rectangle<[f64; 2]>, T>;

pub struct RTreeIndex<T> {
    tree: RTree<RTreeItem<T>>,
}

impl<T: Copy> RTreeIndex<T> {
    pub fn bulk_load(entries: Vec<(Rect<f64>, T)>) -> Self {
        let items = entries
            .into_iter()
            .map(|(rect, item)| {
                let (min, max) = (rect.min(), rect.max());
                GeomWithData::new(Rectangle::from_corners([min.x, min.y], [max.x, max.y]), item)
            })
            .collect();
        Self {
            tree: RTree::bulk_load(items),
        }
    }
}

impl<T: Copy + Ord + Send + Sync> SpatialIndex<T> for RTreeIndex<T> {
    fn query(&self, envelope: &Rect<f64>) -> Vec<T> {
        let (min, max) = (envelope.min(), envelope.max());
        let aabb = AABB::from_corners([min.x, min.y], [max.x, max.y]);
        let mut found: Vec<T> = self
            .tree
            .locate_in_envelope_intersecting(&aabb)
            .map(|item| item.data)
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    fn len(&self) -> usize {
        self.tree.size()
    }
}

/// Uniform grid. An entry is stored in every cell its envelope touches.
pub struct HashGridIndex<T> {
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<T>>,
    len: usize,
}

impl<T: Copy> HashGridIndex<T> {
    pub fn build(entries: Vec<(Rect<f64>, T)>, cell_size: f64) -> Self {
        let mut grid = Self {
            cell_size,
            cells: HashMap::new(),
            len: entries.len(),
        };
        for (rect, item) in entries {
            let ((x0, y0), (x1, y1)) = grid.cell_range(&rect);
            for x in x0..=x1 {
                for y in y0..=y1 {
                    grid.cells.entry((x, y)).or_default().push(item);
                }
            }
        }
        grid
    }

    fn cell_range(&self, rect: &Rect<f64>) -> ((i64, i64), (i64, i64)) {
        let cell = |v: f64| (v / self.cell_size).floor() as i64;
        let (min, max) = (rect.min(), rect.max());
        ((cell(min.x), cell(min.y)), (cell(max.x), cell(max.y)))
    }
}

impl<T: Copy + Ord + Send + Sync> SpatialIndex<T> for HashGridIndex<T> {
    fn query(&self, envelope: &Rect<f64>) -> Vec<T> {
        let ((x0, y0), (x1, y1)) = self.cell_range(envelope);
        let mut found = Vec::new();
        for x in x0..=x1 {
            for y in y0..=y1 {
                if let Some(items) = self.cells.get(&(x, y)) {
                    found.extend_from_slice(items);
                }
            }
        }
        found.sort_unstable();
        found.dedup();
        found
    }

    fn len(&self) -> usize {
        self.len
    }
}
