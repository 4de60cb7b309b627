pub mod error_code;
pub mod gate_error;
pub mod storage_error;

pub use error_code::SoluceErrorCode;
pub use gate_error::{GateError, GateResult};
pub use storage_error::StorageError;
