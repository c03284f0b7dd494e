use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use tempfile::NamedTempFile;

use crate::hashing::Hash;
use crate::object::blob::decode_blob;
use crate::object::commit::{Commit, decode_commit};
use crate::object::tree::{Tree, decode_tree};
use crate::object::{Object, ObjectType, envelope};
use crate::utils::zlib;
use crate::{Constants, Error, Result};

/// Stored objects are never modified, so they are created read only.
#[cfg(unix)]
const OBJECT_FILE_MODE: u32 = 0o444;

/// Persists objects as zlib compressed envelopes under `{objects_dir}/{2 hex chars}/{38 hex chars}`.
///
/// The objects directory must already exist, the store only creates the prefix folders inside it.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    objects_dir: PathBuf,
    compression: Compression,
}

impl ObjectStore {
    pub fn new(objects_dir: impl Into<PathBuf>) -> Self {
        Self {
            objects_dir: objects_dir.into(),
            compression: Compression::default(),
        }
    }

    /// Creates a store for the objects folder inside of the repository folder `repository_dir`
    /// (usually the `.git` folder).
    pub fn in_repository(repository_dir: &Path) -> Self {
        Self::new(Constants::objects_path(repository_dir))
    }

    /// Sets the zlib level used when writing. Reading accepts any level.
    pub fn with_compression(mut self, level: Compression) -> Self {
        self.compression = level;
        self
    }

    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Returns the path an object with `hash` is stored at, whether it exists or not.
    pub fn object_path(&self, hash: Hash) -> PathBuf {
        self.objects_dir.join(hash.prefix()).join(hash.remainder())
    }

    pub fn exists(&self, hash: Hash) -> bool {
        self.object_path(hash).is_file()
    }

    /// Encodes, compresses and writes an object, returning the hash used to find it.
    ///
    /// Writing an object that is already stored does nothing. The data is written to a temporary
    /// file in the prefix folder and then renamed into place, so the object path only ever holds
    /// complete objects. A stored file that does not verify against its hash is replaced.
    ///
    /// # Errors
    ///
    /// This function can fail if the objects directory does not exist or it was not possible to
    /// create and write to the file.
    pub fn write(&self, kind: ObjectType, payload: &[u8]) -> Result<Hash> {
        let data = envelope::encode(kind, payload);
        let hash = Hash::of(&data);
        let path = self.object_path(hash);

        let replace = path.exists();
        if replace {
            match self.read_verified(hash) {
                Ok(_) => {
                    log::debug!("{} {} already stored", kind, hash);
                    return Ok(hash);
                }
                Err(e) => log::warn!("replacing damaged object {}: {}", hash, e),
            }
        }

        let compressed = zlib::compress(&data, self.compression)?;

        let folder_path = self.objects_dir.join(hash.prefix());
        match fs::create_dir(&folder_path) {
            Ok(()) => log::trace!("created object folder {:?}", folder_path),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.into()),
        }

        let mut temp = NamedTempFile::new_in(&folder_path)?;
        temp.write_all(&compressed)?;
        temp.as_file().sync_all()?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp.as_file()
                .set_permissions(fs::Permissions::from_mode(OBJECT_FILE_MODE))?;
        }

        let published = if replace {
            temp.persist(&path)
        } else {
            temp.persist_noclobber(&path)
        };
        match published {
            Ok(_) => {}
            // Someone else stored the same content first, it is byte identical
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                log::debug!("{} {} was stored concurrently", kind, hash);
                return Ok(hash);
            }
            Err(e) => return Err(e.error.into()),
        }

        log::debug!(
            "wrote {} {} ({} bytes, {} compressed)",
            kind,
            hash,
            data.len(),
            compressed.len()
        );
        Ok(hash)
    }

    pub fn write_object(&self, object: &Object) -> Result<Hash> {
        self.write(object.kind(), &object.payload()?)
    }

    /// Returns the decompressed envelope stored for `hash`.
    fn read_envelope(&self, hash: Hash) -> Result<Vec<u8>> {
        let path = self.object_path(hash);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::ObjectNotFound(hash)),
            Err(e) => return Err(e.into()),
        };
        log::trace!("read {} bytes from {:?}", data.len(), path);

        zlib::decompress(&data).map_err(|e| Error::CorruptObject {
            hash,
            reason: format!("could not decompress: {}", e),
        })
    }

    /// Reads the object stored for `hash`, returning its kind and payload.
    ///
    /// The content is not hashed again to check it matches `hash`, use `read_verified` for that.
    ///
    /// # Errors
    ///
    /// - `Error::ObjectNotFound` if there is no file for `hash`.
    /// - `Error::CorruptObject` if the file is not a valid zlib stream.
    /// - `Error::MalformedEnvelope` if the decompressed data is not a valid envelope.
    pub fn read(&self, hash: Hash) -> Result<(ObjectType, Vec<u8>)> {
        let data = self.read_envelope(hash)?;
        let (kind, payload) = envelope::decode(&data)?;
        log::debug!("read {} {}", kind, hash);
        Ok((kind, payload.to_vec()))
    }

    /// Same as `read`, but also checks that the stored envelope hashes to `hash`.
    ///
    /// # Errors
    ///
    /// Fails with `Error::CorruptObject` if the hashes differ.
    pub fn read_verified(&self, hash: Hash) -> Result<(ObjectType, Vec<u8>)> {
        let data = self.read_envelope(hash)?;
        let actual = Hash::of(&data);
        if actual != hash {
            log::warn!("object {} hashes to {}", hash, actual);
            return Err(Error::CorruptObject {
                hash,
                reason: format!("content hashes to {}", actual),
            });
        }
        let (kind, payload) = envelope::decode(&data)?;
        Ok((kind, payload.to_vec()))
    }

    pub fn read_object(&self, hash: Hash) -> Result<Object> {
        let (kind, payload) = self.read(hash)?;
        Object::from_parts(kind, &payload)
    }

    /// Reads a blob, failing with `Error::UnexpectedKind` if `hash` is another kind of object.
    pub fn read_blob(&self, hash: Hash) -> Result<Vec<u8>> {
        decode_blob(&self.read_envelope(hash)?)
    }

    /// Reads a tree, failing with `Error::UnexpectedKind` if `hash` is another kind of object.
    pub fn read_tree(&self, hash: Hash) -> Result<Tree> {
        decode_tree(&self.read_envelope(hash)?)
    }

    /// Reads a commit, failing with `Error::UnexpectedKind` if `hash` is another kind of object.
    pub fn read_commit(&self, hash: Hash) -> Result<Commit> {
        decode_commit(&self.read_envelope(hash)?)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::byteable::Byteable;
    use crate::object::commit::Signature;
    use crate::object::tree::{FILE_MODE, TreeEntry, build_tree};

    const HELLO_BLOB_HASH: &str = "ce013625030ba8dba906f756967f9e9ca394464a";
    const MISSING_HASH: &str = "0123456789abcdef0123456789abcdef01234567";

    fn test_store() -> (tempfile::TempDir, ObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::new(dir.path());
        (dir, store)
    }

    fn test_signature() -> Signature {
        Signature::with_offset_minutes("Test User", "test@example.com", 1700000000, 480).unwrap()
    }

    #[test]
    fn test_object_path() {
        let store = ObjectStore::new("/repo/.git/objects");
        let hash = Hash::from_str(HELLO_BLOB_HASH).unwrap();
        assert_eq!(
            store.object_path(hash),
            PathBuf::from("/repo/.git/objects/ce/013625030ba8dba906f756967f9e9ca394464a")
        );
    }

    #[test]
    fn test_in_repository() {
        let store = ObjectStore::in_repository(Path::new("/repo/.git"));
        assert_eq!(store.objects_dir(), Path::new("/repo/.git/objects"));
    }

    #[test]
    fn test_write_hello_blob() {
        let (_dir, store) = test_store();
        let hash = store.write(ObjectType::Blob, b"hello\n").unwrap();

        assert_eq!(hash.to_string(), HELLO_BLOB_HASH);
        assert!(store.exists(hash));

        // the file holds the compressed envelope
        let stored = fs::read(store.object_path(hash)).unwrap();
        assert_eq!(zlib::decompress(&stored).unwrap(), b"blob 6\0hello\n");
    }

    #[test]
    fn test_write_is_idempotent() {
        let (_dir, store) = test_store();
        let first = store.write(ObjectType::Blob, b"same content").unwrap();
        let stored = fs::read(store.object_path(first)).unwrap();

        let second = store.write(ObjectType::Blob, b"same content").unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read(store.object_path(second)).unwrap(), stored);
    }

    #[test]
    fn test_write_leaves_only_the_object() {
        let (_dir, store) = test_store();
        let hash = store.write(ObjectType::Blob, b"hello\n").unwrap();

        let folder = store.objects_dir().join(hash.prefix());
        let names: Vec<_> = fs::read_dir(folder)
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, [std::ffi::OsString::from(hash.remainder())]);
    }

    #[cfg(unix)]
    #[test]
    fn test_written_object_is_read_only() {
        let (_dir, store) = test_store();
        let hash = store.write(ObjectType::Blob, b"hello\n").unwrap();
        let permissions = fs::metadata(store.object_path(hash)).unwrap().permissions();
        assert!(permissions.readonly());
    }

    #[test]
    fn test_write_replaces_truncated_object() {
        let (_dir, store) = test_store();
        let hash = Hash::from_str(HELLO_BLOB_HASH).unwrap();

        // half of a valid stream, as left by an interrupted writer
        let compressed = zlib::compress(b"blob 6\0hello\n", Compression::default()).unwrap();
        let path = store.object_path(hash);
        fs::create_dir(path.parent().unwrap()).unwrap();
        fs::write(&path, &compressed[..compressed.len() / 2]).unwrap();
        assert!(matches!(store.read(hash), Err(Error::CorruptObject { .. })));

        assert_eq!(store.write(ObjectType::Blob, b"hello\n").unwrap(), hash);
        assert_eq!(
            store.read(hash).unwrap(),
            (ObjectType::Blob, b"hello\n".to_vec())
        );
    }

    #[test]
    fn test_concurrent_writes_of_same_object() {
        let (_dir, store) = test_store();
        let payload = vec![b'x'; 64 * 1024];

        let hashes: Vec<Hash> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| store.write(ObjectType::Blob, &payload).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let expected = Hash::compute(ObjectType::Blob, &payload);
        assert!(hashes.iter().all(|hash| *hash == expected));
        assert_eq!(store.read_blob(expected).unwrap(), payload);
        let entries = fs::read_dir(store.objects_dir().join(expected.prefix()))
            .unwrap()
            .count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_write_into_existing_prefix_folder() {
        let (_dir, store) = test_store();
        let hash = Hash::compute(ObjectType::Blob, b"data");

        // as left behind by another object sharing the same prefix
        fs::create_dir(store.objects_dir().join(hash.prefix())).unwrap();

        assert_eq!(store.write(ObjectType::Blob, b"data").unwrap(), hash);
        assert!(store.exists(hash));
    }

    #[test]
    fn test_write_without_objects_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::new(dir.path().join("missing"));
        let result = store.write(ObjectType::Blob, b"data");
        assert!(matches!(result, Err(Error::IO(_))));
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_read_round_trip_all_kinds() {
        let (_dir, store) = test_store();

        let blob_hash = store.write(ObjectType::Blob, b"hello\n").unwrap();
        let tree = build_tree(&[TreeEntry::new(FILE_MODE, "hello.txt", blob_hash).unwrap()]);
        let tree_payload = tree.as_bytes().unwrap();
        let tree_hash = store.write(ObjectType::Tree, &tree_payload).unwrap();
        let commit = Commit::new(
            tree_hash,
            vec![],
            test_signature(),
            test_signature(),
            "Initial commit\n",
        );
        let commit_payload = commit.as_bytes().unwrap();
        let commit_hash = store.write(ObjectType::Commit, &commit_payload).unwrap();

        assert_eq!(
            store.read(blob_hash).unwrap(),
            (ObjectType::Blob, b"hello\n".to_vec())
        );
        assert_eq!(
            store.read(tree_hash).unwrap(),
            (ObjectType::Tree, tree_payload)
        );
        assert_eq!(
            store.read(commit_hash).unwrap(),
            (ObjectType::Commit, commit_payload)
        );

        assert_eq!(store.read_tree(tree_hash).unwrap(), tree);
        assert_eq!(store.read_commit(commit_hash).unwrap(), commit);
        assert_eq!(store.read_blob(blob_hash).unwrap(), b"hello\n");
    }

    #[test]
    fn test_commit_with_two_parents() {
        let (_dir, store) = test_store();
        let tree_hash = store.write(ObjectType::Tree, b"").unwrap();
        let first = store
            .write_object(&Object::from(Commit::new(
                tree_hash,
                vec![],
                test_signature(),
                test_signature(),
                "first",
            )))
            .unwrap();
        let second = store
            .write_object(&Object::from(Commit::new(
                tree_hash,
                vec![],
                test_signature(),
                test_signature(),
                "second",
            )))
            .unwrap();

        let merge = Commit::new(
            tree_hash,
            vec![second, first],
            test_signature(),
            test_signature(),
            "merge",
        );
        let merge_hash = store.write_object(&Object::from(merge)).unwrap();

        let read = store.read_commit(merge_hash).unwrap();
        assert_eq!(read.parents(), [second, first]);
    }

    #[test]
    fn test_read_missing_object() {
        let (_dir, store) = test_store();
        let hash = Hash::from_str(MISSING_HASH).unwrap();
        assert!(!store.exists(hash));
        assert!(matches!(store.read(hash), Err(Error::ObjectNotFound(h)) if h == hash));
        assert!(matches!(store.read_blob(hash), Err(Error::ObjectNotFound(_))));
    }

    #[test]
    fn test_read_corrupt_object() {
        let (_dir, store) = test_store();
        let hash = Hash::from_str(MISSING_HASH).unwrap();
        let path = store.object_path(hash);
        fs::create_dir(path.parent().unwrap()).unwrap();
        fs::write(&path, b"not zlib at all").unwrap();

        assert!(matches!(store.read(hash), Err(Error::CorruptObject { .. })));
    }

    #[test]
    fn test_read_malformed_envelope() {
        let (_dir, store) = test_store();
        let hash = Hash::from_str(MISSING_HASH).unwrap();
        let path = store.object_path(hash);
        fs::create_dir(path.parent().unwrap()).unwrap();
        let compressed = zlib::compress(b"blob 10\0short", Compression::default()).unwrap();
        fs::write(&path, compressed).unwrap();

        assert!(matches!(store.read(hash), Err(Error::MalformedEnvelope(_))));
    }

    #[test]
    fn test_read_unexpected_kind() {
        let (_dir, store) = test_store();
        let tree_hash = store.write(ObjectType::Tree, b"").unwrap();

        assert!(matches!(
            store.read_blob(tree_hash),
            Err(Error::UnexpectedKind {
                expected: ObjectType::Blob,
                found: ObjectType::Tree
            })
        ));
        assert!(matches!(
            store.read_commit(tree_hash),
            Err(Error::UnexpectedKind { .. })
        ));
    }

    #[test]
    fn test_read_verified() {
        let (_dir, store) = test_store();
        let hello = store.write(ObjectType::Blob, b"hello\n").unwrap();
        let other = store.write(ObjectType::Blob, b"other\n").unwrap();
        assert!(store.read_verified(hello).is_ok());

        // placing the content of `other` at the path of `hello`
        let hello_path = store.object_path(hello);
        let other_data = fs::read(store.object_path(other)).unwrap();
        fs::remove_file(&hello_path).unwrap();
        fs::write(&hello_path, other_data).unwrap();

        // a plain read trusts the file
        assert_eq!(store.read(hello).unwrap().1, b"other\n");
        assert!(matches!(
            store.read_verified(hello),
            Err(Error::CorruptObject { .. })
        ));
    }

    #[test]
    fn test_read_object() {
        let (_dir, store) = test_store();
        let object = Object::Blob(b"some bytes \xff".to_vec());
        let hash = store.write_object(&object).unwrap();
        assert_eq!(store.read_object(hash).unwrap(), object);
    }

    #[test]
    fn test_compression_levels_are_compatible() {
        let (_dir, store) = test_store();
        let store = store.with_compression(Compression::none());
        let hash = store.write(ObjectType::Blob, b"stored without compression").unwrap();
        assert_eq!(hash, Hash::compute(ObjectType::Blob, b"stored without compression"));
        assert_eq!(
            store.read_blob(hash).unwrap(),
            b"stored without compression"
        );
    }
}
