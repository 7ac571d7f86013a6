//! HTTP wire-format types: the request parser (4.D), response builder
//! (4.E), and the small set of enums both lean on.

pub(crate) mod request;
pub(crate) mod response;
pub(crate) mod types;
