//! Core primitives for the community wallet SDK: user operation types and
//! wire codec, the action-to-calldata encoding table, the compressed link
//! codec and assorted text utilities shared by the higher crates.

pub mod abi;
pub mod amount;
pub mod calldata;
pub mod compress;
pub mod text;
pub mod userop;

pub use calldata::{CalldataBuilder, account_init_code};
pub use compress::{CodecError, compress, decompress};
pub use userop::UserOperation;
