pub mod index;
pub mod input;
pub mod pairs;

pub use index::{ActivityIndex, PrunedIndex};
pub use input::{load_activity_file, read_activity, InputOptions, InputStats};
pub use pairs::{generate_pairs, AddressPair, PairOrder, PairStats};
