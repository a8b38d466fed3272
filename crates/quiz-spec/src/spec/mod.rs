pub mod catalog;
pub mod interest;

pub use catalog::{CatalogError, CourseOptions, Extras, OptionCatalog, ServiceOptions};
pub use interest::{Interest, ServiceHistory};
