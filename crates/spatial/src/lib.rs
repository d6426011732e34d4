pub mod kdtree;
pub mod multimap;

pub use kdtree::{KdTree, Neighbour};
pub use multimap::SortedMultiMap;
