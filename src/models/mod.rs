//! Data Models
//!
//! Typed shapes used by the record layer.

mod filter;
mod page;
mod record;

pub use filter::ModuleFilter;
pub use page::RecordPage;
pub use record::Record;
