pub mod accounts;
pub mod catalog;
pub mod readings;

pub use accounts::AccountLookup;
pub use catalog::PlanCatalog;
pub use readings::{InMemoryReadingStore, ReadingStore};
