//! Testing utilities for code built on ironbrc.
//!
//! - **Builders**: generate deterministic measurement input of any size
//! - **Fixtures**: known input/report pairs
//! - **Assertions**: a naive reference implementation and report comparison
//! - **Mock I/O**: readers that deliver data in awkward pieces or fail, and
//!   temporary measurement files
//!
//! # Quick Start
//!
//! ```
//! use ironbrc::testing::*;
//! use ironbrc::{ExecMode, RunConfig, Runner};
//!
//! let input = MeasurementBuilder::new().keys(20).records(500).seed(7).build();
//!
//! let runner = Runner::new(ExecMode::Streaming, RunConfig::default().with_block_size(64));
//! let summary = runner.run(ChunkedReader::new(input.as_bytes(), 5)).unwrap();
//!
//! assert_reports_equal(&summary.report(), &naive_report(&input));
//! ```

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod mock_io;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
pub use mock_io::*;
