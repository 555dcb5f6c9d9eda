/// Business logic layer.
pub mod aggregate;
pub mod catalog;
pub mod log_forwarder;
pub mod ugc;

pub use aggregate::AggregateService;
pub use catalog::{BookmarkService, LikeService, ReviewService};
pub use log_forwarder::LogForwarder;
pub use ugc::{sort_doc, Page, UgcService, MAX_PAGE_SIZE};
