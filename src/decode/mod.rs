//! Response decoder module
//!
//! Extracts the record array from a decoded Recharge list response.

mod decoders;
mod types;

pub(crate) use decoders::json_kind;
pub use decoders::JsonDecoder;
pub use types::RecordDecoder;

#[cfg(test)]
mod tests;
