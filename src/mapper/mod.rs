//! Structure mapping between records.

pub mod engine;
pub mod types;

pub use engine::{map_structs, StructMapper};
pub use types::{MapReport, MapperConfig, MismatchPolicy, NameMatching};
