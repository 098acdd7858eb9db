#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

use alloc::{boxed::Box, string::String, vec::Vec};

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod transcode;
pub mod types;
pub mod value;

pub use config::Config;
pub use decode::{Decoder, State};
pub use encode::Encoder;
pub use error::Error;
pub use transcode::{
    decode_sequence, decode_sequence_with_config, decode_tree, decode_tree_with_config,
    encode_tree,
};
pub use value::{Indefinite, Map, SimpleCode, Value};


#[cfg(test)]
mod encode_tests;

#[cfg(test)]
mod transcode_tests;
