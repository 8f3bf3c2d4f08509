//! # packed_column
//!
//! Fixed-bit-width packed vector with batched equality search.
//!
//! Values are stored with exactly `bit_width` bits each (1..=64), packed
//! back to back across `u64` words. Two searches are offered: a scalar scan
//! decoding one element at a time, and a batch scan decoding eight elements
//! per step from a four-word window using a precomputed shift schedule.
//!
//! ```rust
//! use packed_column::PackedVec;
//!
//! // Store 17-bit values (0-131071)
//! let mut column = PackedVec::new(17, 20).expect("Failed to create store");
//! for i in 0..20 {
//!     column.push(i).unwrap();
//! }
//!
//! assert_eq!(column.get(7), Some(7));
//! assert_eq!(column.scalar_search(7), column.batch_search(7).unwrap());
//! ```
//!
//! ## Memory Savings Example
//!
//! ```rust
//! use packed_column::PackedVec;
//!
//! // Vec<u32>: 1000 elements × 4 bytes = 4000 bytes
//! // PackedVec at 10 bits: 1000 elements × 10 bits = 157 words = 1256 bytes
//! let packed = PackedVec::from_values(10, &(0..1000).collect::<Vec<u64>>()).unwrap();
//! assert_eq!(packed.words().len(), 157);
//! ```
//!
//! ## Features
//!
//! - `std` (default): `thiserror` errors and runtime CPU feature detection.
//! - `simd` (default): AVX2 batch kernels on x86_64.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod error;
pub use error::PackedError;

mod bit_ops;
mod index;

pub mod fixed;
pub mod schedule;
pub mod search;
pub mod store;
pub mod window;

pub use fixed::FixedWidth;
pub use schedule::ShiftSchedule;
pub use search::{Kernel, SearchStrategy, batch_search, batch_search_with, scalar_search};
pub use store::{Growth, PackedVec};
