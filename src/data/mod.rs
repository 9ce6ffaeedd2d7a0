//! Dataset loading and splitting

mod loader;
mod split;

pub use loader::{DataLoader, LoadReport, LoadedDataset};
pub use split::{train_test_split, TrainTestSplit};
