pub mod asset_store;
pub mod brief_store;
pub mod error;

pub use asset_store::scan_assets;
pub use brief_store::{list_briefs, read_brief, BriefEntry};
pub use error::StoreError;
