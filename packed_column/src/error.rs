use raw_words::ContainerError;
#[cfg(feature = "std")]
use thiserror::Error;

#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackedError {
    #[cfg_attr(
        feature = "std",
        error("Bit width must be in the range 1..=64, got {0}")
    )]
    InvalidBitWidth(u32),

    #[cfg_attr(
        feature = "std",
        error("Store is full: declared size is {capacity} elements")
    )]
    OutOfCapacity { capacity: usize },

    #[cfg_attr(feature = "std", error("Index {0} is out of bounds for length {1}"))]
    IndexOutOfBounds(usize, usize),

    #[cfg_attr(
        feature = "std",
        error("No batch shift schedule exists for bit width {0}")
    )]
    UnsupportedWidth(u32),

    #[cfg_attr(feature = "std", error("storage error: {0}"))]
    Container(#[cfg_attr(feature = "std", from)] ContainerError),
}

#[cfg(not(feature = "std"))]
impl From<ContainerError> for PackedError {
    fn from(err: ContainerError) -> Self {
        PackedError::Container(err)
    }
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for PackedError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PackedError::InvalidBitWidth(n) => {
                write!(f, "Bit width must be in the range 1..=64, got {}", n)
            }
            PackedError::OutOfCapacity { capacity } => {
                write!(f, "Store is full: declared size is {} elements", capacity)
            }
            PackedError::IndexOutOfBounds(i, l) => {
                write!(f, "Index {} is out of bounds for length {}", i, l)
            }
            PackedError::UnsupportedWidth(n) => {
                write!(f, "No batch shift schedule exists for bit width {}", n)
            }
            PackedError::Container(e) => write!(f, "storage error: {}", e),
        }
    }
}
