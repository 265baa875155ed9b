//! Named shared-memory region wrapping a [`SharedBuffer`]
//! (SPEC_FULL.md §4.5, §6, §9 "Cross-process mutable shared memory").
//!
//! Built on the `shared_memory` crate rather than raw `libc` calls, per the
//! decision recorded in DESIGN.md: the corpus has no interprocess-shared-
//! memory precedent of its own to imitate, and `shared_memory` is the
//! standard real crate for this.

use std::fs;
use std::path::Path;

use shared_memory::ShmemConf;

use crate::errors::HostError;
use crate::shared_buffer::SharedBuffer;

pub struct SharedMemoryMain {
    shmem: shared_memory::Shmem,
}

impl SharedMemoryMain {
    /// Creates a fresh named region and places a zeroed `SharedBuffer` in
    /// it. Sized to the larger of `SHARED_BUFFER_SIZE` (§6's nominal
    /// default) and the buffer's true computed layout, since a `TransferState`
    /// with its full-size terrain grid exceeds the nominal constant (see
    /// DESIGN.md).
    pub fn create(name: &str) -> Result<Self, HostError> {
        let size = std::mem::size_of::<SharedBuffer>().max(cc_core::SHARED_BUFFER_SIZE);
        let shmem = ShmemConf::new().size(size).os_id(name).create().map_err(|e| {
            HostError::SharedMemoryInit { name: name.to_string(), message: e.to_string() }
        })?;
        let main = SharedMemoryMain { shmem };
        unsafe {
            (main.as_mut_ptr()).write(SharedBuffer::default());
        }
        Ok(main)
    }

    /// Opens a region a host process already created, by its OS id. Used by
    /// the player-side harness in tests; real player processes read the
    /// name from the `shm1.txt`/`shm2.txt` handoff file instead of calling
    /// this directly.
    pub fn open(name: &str) -> Result<Self, HostError> {
        let shmem = ShmemConf::new().os_id(name).open().map_err(|e| HostError::SharedMemoryInit {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        Ok(SharedMemoryMain { shmem })
    }

    /// Writes this region's OS id to `path`, the file a player process
    /// reads at launch to find its shared-memory region (SPEC_FULL.md §6).
    pub fn write_name_file(&self, path: &Path) -> std::io::Result<()> {
        fs::write(path, self.shmem.get_os_id())
    }

    fn as_mut_ptr(&self) -> *mut SharedBuffer {
        self.shmem.as_ptr() as *mut SharedBuffer
    }

    pub fn buffer(&self) -> &SharedBuffer {
        unsafe { &*(self.as_mut_ptr() as *const SharedBuffer) }
    }

    /// Copies a fresh snapshot into the region. Only safe to call once the
    /// baton confirms the player side is not reading it (the host's
    /// exclusive-writer window, SPEC_FULL.md §5).
    pub fn write_snapshot(&self, snapshot: &cc_state::TransferState) {
        unsafe {
            (*self.as_mut_ptr()).snapshot = *snapshot;
        }
    }
}

// Safety: `SharedBuffer`'s only fields exchanged across the process
// boundary are atomics and the POD `TransferState`; the baton in
// `SharedBuffer` is the documented single-writer-per-field invariant
// (SPEC_FULL.md §5).
unsafe impl Send for SharedMemoryMain {}
unsafe impl Sync for SharedMemoryMain {}
