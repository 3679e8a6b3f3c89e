// # Object Manager
//
// Binds a single codec-capable object to a file path backed by a
// memory-mapped region. The region is scoped to one save or load call and
// released on every exit path; the file's length after a successful save
// equals the object's reported serialized size.
//
// The manager performs no locking: another process may map the same file,
// and serializing access across writers is the caller's contract.

use crate::error::{FerryError, Result};
use crate::serial::buffer::SerializedBuffer;
use crate::serial::contract::{Deserializable, Serializable};
use memmap2::MmapOptions;
use std::fs::OpenOptions;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Writer/reader binding one serializable object to one mapped file.
#[derive(Debug)]
pub struct ObjectManager<T> {
    path: PathBuf,
    _object: PhantomData<fn() -> T>,
}

impl<T> ObjectManager<T> {
    /// Record the file path. The file system is not touched until a save
    /// or load runs.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _object: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Serializable> ObjectManager<T> {
    /// Size the file to the object's reported length, map it read-write,
    /// and copy the encoded bytes into the region.
    ///
    /// A codec error leaves the region unflushed; the file is then truncated
    /// to the requested size with undefined content, so callers that need
    /// atomicity must wrap the save in a higher-level rename.
    pub fn save(&self, object: &T) -> Result<()> {
        let size = object.serialized_size();
        if size == 0 {
            return Err(FerryError::NoSerializableData(
                "object reports an empty serialized form".to_string(),
            ));
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        file.set_len(size as u64)?;

        // Safety: the mapping lives only inside this call and the file is
        // not resized while it is held; cross-process writers are excluded
        // by the caller's access contract.
        let mut region = unsafe { MmapOptions::new().len(size).map_mut(&file)? };

        let buffer = object.serialize()?;
        if buffer.len() != size {
            return Err(FerryError::encode_failed(format!(
                "object serialized to {} bytes but reported {}",
                buffer.len(),
                size
            )));
        }
        region.copy_from_slice(buffer.as_slice());
        region.flush()?;

        tracing::debug!(
            path = %self.path.display(),
            bytes = size,
            "object saved to mapped file"
        );
        Ok(())
    }
}

impl<T: Deserializable> ObjectManager<T> {
    /// Map the whole file read-only and decode a fresh object from a
    /// borrowed view of the region. The returned object owns independent
    /// storage; the mapping is dropped on return.
    pub fn load(&self) -> Result<T> {
        self.load_with(T::deserialize)
    }
}

impl<T> ObjectManager<T> {
    /// Like `load`, but with a caller-supplied decoder. Used for objects
    /// whose byte stream does not carry everything a decode needs, such as
    /// a table read under a reader-supplied schema.
    pub fn load_with<F>(&self, decode: F) -> Result<T>
    where
        F: FnOnce(&SerializedBuffer<'_>) -> Result<T>,
    {
        let file = OpenOptions::new().read(true).open(&self.path)?;
        if file.metadata()?.len() == 0 {
            return Err(FerryError::NoDeserializableData);
        }

        // Safety: read-only mapping scoped to this call; see `save`.
        let region = unsafe { MmapOptions::new().map(&file)? };
        let view = SerializedBuffer::view(&region);
        let object = decode(&view)?;

        tracing::debug!(
            path = %self.path.display(),
            bytes = region.len(),
            "object loaded from mapped file"
        );
        Ok(object)
    }
}
