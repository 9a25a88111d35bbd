pub mod store;

pub use store::StudioStore;
