//! Reading and writing tab-delimited coordinate files.
//!
//! Both inputs share one layout:
//!
//! ```text
//! EPSG:32633                                  <- CRS header, opaque, line 1
//! 512034.112	5403120.551	412.031	...	IMG_0001.JPG
//! 512034.113	5403120.549	412.030	...	IMG_0002.JPG
//! ```
//!
//! - [`tsv`]: reads the header and the non-blank data rows, and writes filtered rows
//!   back out behind the original header
//! - [`coordinates`]: parses X, Y and Z out of a row
//!
//! | Column | Meaning | Required |
//! |--------|---------|----------|
//! | 0 | X | Yes |
//! | 1 | Y | Yes |
//! | 2 | Z | Yes |
//! | 5 | Image identifier | No |
//!
//! Numbers use a period as decimal separator regardless of locale.

pub mod coordinates;
pub mod tsv;

pub use coordinates::{parse_coordinates, ParseError};
pub use tsv::{read_tabular_file, write_tabular_file, ReadError, TabularFile, WriteError};
