//! Company data: records, the read-only table, and the CSV loader.

pub mod company;
pub mod csv;

pub use self::csv::{load_csv, read_csv, LoadOptions};
pub use company::{Company, CompanyTable};
