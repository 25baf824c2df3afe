#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use tc_codec as codec;
pub use tc_format as format;
pub use tc_schema as schema;
pub use tc_utils as utils;
pub use tc_wire as wire;

pub use tc_format::{Error, Format, dumps, dumps_of, loads, loads_as, loads_of};
