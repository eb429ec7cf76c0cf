//! # tv-root
//!
//! Native ROOT file reader for trigger-comparison.
//!
//! Reads TH1D/TH1F histograms, including alphanumeric axis labels, from
//! `.root` files without requiring external ROOT libraries. Objects may live in
//! nested `TDirectoryFile`s. Supports zlib, LZ4, ZSTD, and XZ compression.
//!
//! ## Example
//!
//! ```no_run
//! use tv_root::RootFile;
//!
//! let f = RootFile::open("validation.root").unwrap();
//! for key in f.list_keys().unwrap() {
//!     println!("{} ({})", key.name, key.class_name);
//! }
//! let h = f.get_histogram("TriggerBits/L1Paths").unwrap();
//! println!("paths: {:?}", h.bin_labels());
//! ```

#![warn(clippy::all)]

pub mod decompress;
pub mod directory;
pub mod error;
pub mod file;
pub mod key;
pub mod objects;
pub mod rbuffer;

pub use error::{Result, RootError};
pub use file::RootFile;
pub use key::KeyInfo;
