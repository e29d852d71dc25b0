//! Fixed-capacity byte accumulator for the WT55 framer
//!
//! Sliding the sync window by one byte is O(1): only the tail index moves.

/// Fixed-capacity ring buffer with O(1) advance
///
/// Generic const parameter `N` sets buffer capacity.
pub struct RingBuffer<const N: usize = 64> {
    data: [u8; N],
    head: usize, // Write position (next empty slot)
    tail: usize, // Read position (first valid byte)
    len: usize,
    staging: [u8; N], // For wrapped slice access
}

impl<const N: usize> RingBuffer<N> {
    pub const fn new() -> Self {
        Self {
            data: [0u8; N],
            head: 0,
            tail: 0,
            len: 0,
            staging: [0u8; N],
        }
    }

    /// Append one byte, returns `false` if the buffer is full
    #[inline]
    pub fn push(&mut self, byte: u8) -> bool {
        if self.len == N {
            return false;
        }
        self.data[self.head] = byte;
        self.head = (self.head + 1) % N;
        self.len += 1;
        true
    }

    /// Consume n bytes from the front
    #[inline]
    pub fn advance(&mut self, n: usize) {
        let n = n.min(self.len);
        self.tail = (self.tail + n) % N;
        self.len -= n;
    }

    /// Drop everything
    #[inline]
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte at logical index (handles wraparound)
    #[inline]
    pub fn get(&self, index: usize) -> Option<u8> {
        if index < self.len {
            Some(self.data[(self.tail + index) % N])
        } else {
            None
        }
    }

    /// Whether the buffer starts with `prefix`
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        prefix.len() <= self.len
            && prefix
                .iter()
                .enumerate()
                .all(|(i, &b)| self.get(i) == Some(b))
    }

    /// Contiguous view of `len` bytes starting at `start`
    ///
    /// Copies into the staging area when the range wraps the end of storage.
    pub fn get_slice(&mut self, start: usize, len: usize) -> Option<&[u8]> {
        if start + len > self.len {
            return None;
        }

        let real_start = (self.tail + start) % N;
        if real_start + len <= N {
            Some(&self.data[real_start..real_start + len])
        } else {
            for i in 0..len {
                self.staging[i] = self.data[(real_start + i) % N];
            }
            Some(&self.staging[..len])
        }
    }

    /// Contiguous view of every buffered byte
    pub fn as_slice(&mut self) -> &[u8] {
        let len = self.len;
        self.get_slice(0, len).unwrap_or(&[])
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill<const N: usize>(rb: &mut RingBuffer<N>, bytes: &[u8]) {
        for &b in bytes {
            assert!(rb.push(b));
        }
    }

    #[test]
    fn test_push_until_full() {
        let mut rb: RingBuffer<4> = RingBuffer::new();
        assert!(rb.is_empty());
        for b in 1..=4 {
            assert!(rb.push(b));
        }
        assert!(!rb.push(5));
        assert_eq!(rb.len(), 4);
        assert_eq!(rb.get(3), Some(4));
        assert_eq!(rb.get(4), None);
    }

    #[test]
    fn test_slide_by_one() {
        let mut rb: RingBuffer<8> = RingBuffer::new();
        fill(&mut rb, &[0xFF, 0x57, 0x54]);
        assert!(!rb.starts_with(&[0x57, 0x54]));

        rb.advance(1);
        assert!(rb.starts_with(&[0x57, 0x54]));
        assert_eq!(rb.len(), 2);
    }

    #[test]
    fn test_wrapped_slice() {
        let mut rb: RingBuffer<8> = RingBuffer::new();
        fill(&mut rb, &[1, 2, 3, 4, 5, 6]);
        rb.advance(5); // tail=5, len=1
        fill(&mut rb, &[7, 8, 9]); // head wraps

        assert_eq!(rb.len(), 4);
        assert_eq!(rb.as_slice(), &[6, 7, 8, 9]);
        assert_eq!(rb.get_slice(1, 2).unwrap(), &[7, 8]);
        assert!(rb.get_slice(3, 2).is_none());
    }

    #[test]
    fn test_clear() {
        let mut rb: RingBuffer<8> = RingBuffer::new();
        fill(&mut rb, &[1, 2, 3]);
        rb.clear();
        assert!(rb.is_empty());
        assert_eq!(rb.as_slice(), &[] as &[u8]);
        rb.push(9);
        assert_eq!(rb.get(0), Some(9));
    }
}
