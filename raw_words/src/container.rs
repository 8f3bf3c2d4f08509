use crate::ContainerError;
use bytemuck::Pod;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Heap buffer of typed words.
///
/// `Container<T>` owns a contiguous `Vec<T>` where `T` implements
/// [`bytemuck::Pod`], so the buffer can always be viewed as raw bytes.
/// Every operation that may allocate goes through `try_reserve` and reports
/// a refused allocation as [`ContainerError::AllocationFailed`] instead of
/// aborting.
///
/// # Examples
///
/// ## Zeroed word buffer
///
/// ```
/// use raw_words::Container;
///
/// let mut words = Container::<u64>::zeroed(3).unwrap();
/// words.write(2, u64::MAX).unwrap();
///
/// assert_eq!(words.len(), 3);
/// assert_eq!(words.get(2).unwrap(), &u64::MAX);
/// assert!(words.get(3).is_err());
/// ```
///
/// ## Pod records
///
/// ```
/// use raw_words::Container;
/// use bytemuck_derive::{Pod, Zeroable};
///
/// #[repr(C)]
/// #[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
/// struct Packet {
///     id: u32,
///     value: f32,
/// }
///
/// let mut container = Container::<Packet>::new();
/// container.push(Packet { id: 1, value: 10.0 }).unwrap();
/// container.push(Packet { id: 2, value: 20.0 }).unwrap();
///
/// assert_eq!(container.len(), 2);
/// assert_eq!(container.get(0).unwrap().id, 1);
/// assert_eq!(container.as_bytes().len(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container<T: Pod> {
    data: Vec<T>,
}

impl<T: Pod> Container<T> {
    /// Creates an empty container.
    pub fn new() -> Self {
        Container { data: Vec::new() }
    }

    /// Creates an empty container with room for `capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::AllocationFailed` if the allocation is refused.
    ///
    /// # Examples
    ///
    /// ```
    /// use raw_words::Container;
    ///
    /// let c = Container::<u32>::with_capacity(1000).unwrap();
    /// assert!(c.is_empty());
    /// assert!(c.capacity() >= 1000);
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self, ContainerError> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| ContainerError::AllocationFailed {
                requested: capacity,
            })?;
        Ok(Container { data })
    }

    /// Creates a container holding `len` zeroed elements.
    pub fn zeroed(len: usize) -> Result<Self, ContainerError> {
        let mut c = Self::with_capacity(len)?;
        c.data.resize(len, T::zeroed());
        Ok(c)
    }

    /// Creates a container from a slice.
    pub fn from_slice(values: &[T]) -> Self {
        Container {
            data: values.to_vec(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of elements the buffer holds without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Returns a reference to the element at the given index.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::OutOfBounds` if `index >= len()`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<&T, ContainerError> {
        self.data.get(index).ok_or(ContainerError::OutOfBounds(index))
    }

    /// Returns a mutable reference to the element at the given index.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, ContainerError> {
        self.data
            .get_mut(index)
            .ok_or(ContainerError::OutOfBounds(index))
    }

    /// Writes a value to the element at the given index.
    ///
    /// Equivalent to `*container.get_mut(index)? = value`.
    pub fn write(&mut self, index: usize, value: T) -> Result<(), ContainerError> {
        let slot = self.get_mut(index)?;
        *slot = value;
        Ok(())
    }

    /// Appends an element to the back of the container.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::AllocationFailed` if growing the buffer fails.
    pub fn push(&mut self, value: T) -> Result<(), ContainerError> {
        self.reserve(1)?;
        self.data.push(value);
        Ok(())
    }

    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<(), ContainerError> {
        self.reserve(values.len())?;
        self.data.extend_from_slice(values);
        Ok(())
    }

    /// Reserves room for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) -> Result<(), ContainerError> {
        self.data
            .try_reserve(additional)
            .map_err(|_| ContainerError::AllocationFailed {
                requested: self.data.len().saturating_add(additional),
            })
    }

    /// Grows the container to `new_len` elements, filling new slots with zeroes.
    ///
    /// Shrinking is not supported; a `new_len` at or below `len()` is a no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// use raw_words::Container;
    ///
    /// let mut c = Container::from_slice(&[7u64]);
    /// c.grow_zeroed(3).unwrap();
    /// assert_eq!(c.as_slice(), &[7, 0, 0]);
    /// ```
    pub fn grow_zeroed(&mut self, new_len: usize) -> Result<(), ContainerError> {
        let len = self.data.len();
        if new_len <= len {
            return Ok(());
        }
        self.reserve(new_len - len)?;
        self.data.resize(new_len, T::zeroed());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data.as_mut_slice()
    }

    /// Byte view of the buffer in host byte order.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.data.as_slice())
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }
}

impl<T: Pod> core::ops::Index<usize> for Container<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T: Pod> core::ops::IndexMut<usize> for Container<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl<T: Pod> Default for Container<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck_derive::{Pod, Zeroable};

    #[repr(C)]
    #[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
    struct Packet {
        id: u32,
        value: f32,
    }

    #[test]
    fn in_memory_basic_operations() -> Result<(), ContainerError> {
        let mut c = Container::<Packet>::new();
        assert!(c.is_empty());

        let p1 = Packet { id: 1, value: 10.0 };
        let p2 = Packet { id: 2, value: 20.0 };

        c.push(p1)?;
        c.push(p2)?;
        assert_eq!(c.len(), 2);
        assert_eq!(c.get(0)?, &p1);
        assert_eq!(c.get(1)?, &p2);

        let p3 = Packet { id: 3, value: 30.0 };
        c.write(1, p3)?;
        assert_eq!(c.get(1)?, &p3);

        c.get_mut(0)?.value = 99.0;
        assert_eq!(c.get(0)?.value, 99.0);
        assert_eq!(c.get(2), Err(ContainerError::OutOfBounds(2)));

        Ok(())
    }

    #[test]
    fn index_operations() {
        let mut c = Container::<u64>::from_slice(&[1, 2]);
        assert_eq!(c[0], 1);
        c[1] |= 0x10;
        assert_eq!(c[1], 0x12);
    }

    #[test]
    fn zeroed_words() -> Result<(), ContainerError> {
        let c = Container::<u64>::zeroed(5)?;
        assert_eq!(c.len(), 5);
        assert!(c.iter().all(|&w| w == 0));

        let empty = Container::<u64>::zeroed(0)?;
        assert!(empty.is_empty());
        Ok(())
    }

    #[test]
    fn grow_keeps_existing_words() -> Result<(), ContainerError> {
        let mut c = Container::<u64>::from_slice(&[0xAA, 0xBB]);
        c.grow_zeroed(4)?;
        assert_eq!(c.as_slice(), &[0xAA, 0xBB, 0, 0]);
        c.grow_zeroed(1)?;
        assert_eq!(c.len(), 4);
        Ok(())
    }

    #[test]
    fn extend_and_reserve() -> Result<(), ContainerError> {
        let mut c = Container::<u32>::with_capacity(10)?;
        c.push(1)?;
        c.extend_from_slice(&[2, 3])?;
        assert_eq!(c.len(), 3);
        c.reserve(10)?;
        assert!(c.capacity() >= 13);
        Ok(())
    }

    #[test]
    fn refused_allocation_is_reported() {
        let result = Container::<u64>::with_capacity(usize::MAX);
        assert!(matches!(
            result,
            Err(ContainerError::AllocationFailed { requested: usize::MAX })
        ));
    }

    #[test]
    fn byte_view_covers_every_word() {
        let c = Container::<u64>::from_slice(&[1, 2, 3]);
        let bytes = c.as_bytes();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[8..16], &2u64.to_ne_bytes());
    }

    #[test]
    fn clear_operation() {
        let mut c = Container::<u64>::from_slice(&[1, 2]);
        c.clear();
        assert!(c.is_empty());
    }
}
