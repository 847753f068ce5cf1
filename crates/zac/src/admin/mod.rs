pub mod reference_table;

pub use reference_table::{
    ReferenceTable, ReferenceTableError, ReferenceTableService, ReferenceTableValue,
};
