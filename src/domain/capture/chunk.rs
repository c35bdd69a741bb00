//! Capture chunk value object

/// One unit of compressed audio delivered by an input stream.
///
/// Chunks carry an opaque byte slice of the device's compressed stream;
/// only the concatenation of every chunk, in sequence order, is decodable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    sequence: u64,
    data: Vec<u8>,
}

impl AudioChunk {
    pub fn new(sequence: u64, data: Vec<u8>) -> Self {
        Self { sequence, data }
    }

    /// Position of this chunk in delivery order, starting at 0
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Split a compressed stream into ordered chunks of at most `chunk_size`
    /// bytes. A `chunk_size` of 0 yields a single chunk.
    pub fn split(data: &[u8], chunk_size: usize) -> Vec<Self> {
        if data.is_empty() {
            return Vec::new();
        }
        let size = if chunk_size == 0 { data.len() } else { chunk_size };
        data.chunks(size)
            .enumerate()
            .map(|(i, part)| Self::new(i as u64, part.to_vec()))
            .collect()
    }

    /// Concatenate chunks into the complete compressed stream
    pub fn concat(chunks: &[Self]) -> Vec<u8> {
        let total = chunks.iter().map(Self::len).sum();
        let mut out = Vec::with_capacity(total);
        for chunk in chunks {
            out.extend_from_slice(&chunk.data);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_preserves_order() {
        let data: Vec<u8> = (0..10).collect();
        let chunks = AudioChunk::split(&data, 4);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].data(), &[0, 1, 2, 3]);
        assert_eq!(chunks[2].data(), &[8, 9]);
        assert_eq!(chunks[2].sequence(), 2);
        assert_eq!(AudioChunk::concat(&chunks), data);
    }

    #[test]
    fn split_with_zero_size_is_single_chunk() {
        let chunks = AudioChunk::split(&[1, 2, 3], 0);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 3);
    }

    #[test]
    fn split_empty_stream() {
        assert!(AudioChunk::split(&[], 16).is_empty());
        assert!(AudioChunk::concat(&[]).is_empty());
    }
}
