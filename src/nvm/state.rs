//! Per-block runtime cache record

use super::registry::MAX_BLOCK_SIZE;

/// Mutable runtime state of one block
///
/// `data` is the authoritative in-memory value of the block. It holds
/// exactly the block's configured size once `loaded` is set; reads and
/// writes are served from it without physical I/O.
#[derive(Debug)]
pub struct BlockState {
    /// Cached payload bytes
    pub data: heapless::Vec<u8, MAX_BLOCK_SIZE>,
    /// Whether `data` has been populated (from the medium or the default)
    pub loaded: bool,
    /// Whether `data` may differ from what is persisted on the medium
    ///
    /// Cleared only by a successful physical write of this block.
    pub dirty: bool,
}

impl BlockState {
    /// Create an unloaded, clean state
    pub const fn new() -> Self {
        Self {
            data: heapless::Vec::new(),
            loaded: false,
            dirty: false,
        }
    }

    /// Replace the cached payload, marking the block loaded
    pub fn fill(&mut self, payload: &[u8], dirty: bool) {
        self.data.clear();
        // Payload length is bounded by registry validation
        self.data.extend_from_slice(payload).ok();
        self.loaded = true;
        self.dirty = dirty;
    }
}

impl Default for BlockState {
    fn default() -> Self {
        Self::new()
    }
}
