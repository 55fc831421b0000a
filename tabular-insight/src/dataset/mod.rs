//! Active-dataset state.
//!
//! A [`DatasetStore`] holds the one [`DatasetHandle`] that queries read from.
//! It starts out pointing at the bundled default file and flips to the most
//! recent upload after a successful [`DatasetStore::store_upload`]. Queries
//! never read the store directly: they take a snapshot of the handle once,
//! when their request begins, and scan that file under the caps given by
//! [`RowCapPolicy`].

mod handle;
mod policy;
mod store;

pub use handle::{DatasetHandle, DatasetMode};
pub use policy::{RowCapPolicy, ScanPurpose};
pub use store::{sanitize_filename, DatasetStore, UploadReceipt};
