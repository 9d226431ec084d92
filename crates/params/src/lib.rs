//! Form validation for EIC extraction requests.
//!
//! Everything here is pure: no I/O, no shared state.

pub mod error;
pub mod fields;
pub mod request;

pub use error::ValidationError;
pub use fields::{
    PairFields, RT_RANGE, Y_LIMIT, parse_mz_list, parse_optional_float, validate_paired_range,
    validate_tolerances,
};
pub use request::{DEFAULT_MZ_TOL, DEFAULT_RT_TOL, ExtractionRequest, RawForm};
