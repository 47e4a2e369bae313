#![cfg_attr(docsrs, doc = include_str!("../README.md"))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg, doc_cfg_hide))]
#![cfg_attr(docsrs, deny(missing_docs))]
#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate alloc;
#[cfg(test)]
extern crate std;

#[macro_use]
pub(crate) mod util;

pub mod list;
pub mod pool;
pub mod sort;

#[doc(inline)]
pub use list::List;
#[doc(inline)]
pub use pool::{Pool, PoolError};
#[doc(inline)]
pub use sort::ListMergeSorter;
