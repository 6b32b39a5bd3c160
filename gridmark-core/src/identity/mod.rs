//! Player identity cross-referencing.

pub mod oracle;
pub mod resolver;

pub use oracle::{
    CsvFileOracle, clean_vendor_id, IdKind, Oracle, OracleRow, OracleSource, RemoteCsvOracle,
    StaticOracle,
};
pub use resolver::{PlayerResolver, Resolution};
