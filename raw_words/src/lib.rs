//! # raw_words
//!
//! Heap buffer of plain-old-data words with fallible growth.
//!
//! ```rust
//! use raw_words::Container;
//!
//! let mut words = Container::<u64>::zeroed(4).expect("allocation failed");
//! words[1] |= 0xFF;
//! assert_eq!(words.as_slice(), &[0, 0xFF, 0, 0]);
//! assert_eq!(words.as_bytes().len(), 32);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod container;
pub mod error;

pub use container::Container;
pub use error::ContainerError;
