#[cfg(feature = "std")]
use thiserror::Error;

/// Container errors
#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// Out-of-bounds access
    #[cfg_attr(feature = "std", error("Index {0} out of bounds"))]
    OutOfBounds(usize),

    /// The allocator refused to grow the buffer to `requested` elements
    #[cfg_attr(
        feature = "std",
        error("Allocation of {requested} elements failed")
    )]
    AllocationFailed { requested: usize },
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for ContainerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ContainerError::OutOfBounds(i) => write!(f, "Index {} out of bounds", i),
            ContainerError::AllocationFailed { requested } => {
                write!(f, "Allocation of {} elements failed", requested)
            }
        }
    }
}
