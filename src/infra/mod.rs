pub mod appstore_loader;
pub mod snapshot_catalog;

pub use appstore_loader::HttpAppStoreLoader;
pub use snapshot_catalog::SnapshotCatalog;
