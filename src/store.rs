//! Core store type, builder, the five CRUD operations, and the typed
//! collection view.

use crate::error::{Error, Result};
use crate::lock;
use crate::persist::{atomic_write, load};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A single stored record: a JSON object with at least a string `id` field.
/// Everything besides `id` is caller-defined and passes through untouched.
pub type Fields = serde_json::Map<String, Value>;

/// The whole on-disk structure: collection name → records in insertion order.
pub type Database = BTreeMap<String, Vec<Fields>>;

/// Handle to a JSON-file-backed document store.
///
/// Constructed with an explicit path via [`open`](Self::open) or
/// [`builder`](Self::builder); there is no process-global default file. The
/// handle is cheap to clone and holds no data between calls — every operation
/// re-reads the backing file, so any number of handles on the same path stay
/// consistent with each other.
pub struct DocStore {
    path: PathBuf,
    pretty: bool,
    lock: Arc<RwLock<()>>,
}

impl Clone for DocStore {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            pretty: self.pretty,
            lock: Arc::clone(&self.lock),
        }
    }
}

impl DocStore {
    /// Open (or create) a store backed by the file at `path`, with
    /// pretty-printed output.
    pub fn open(path: impl AsRef<Path>) -> Result<DocStore> {
        Self::builder(path).build()
    }

    /// Start configuring a store. Call [`.build()`](DocStoreBuilder::build)
    /// when ready.
    pub fn builder(path: impl AsRef<Path>) -> DocStoreBuilder {
        DocStoreBuilder::new(path)
    }

    /// Path to the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Typed view of one collection. Records round-trip through `T`; fields a
    /// stored record carries that `T` does not model still survive partial
    /// updates, because merging happens against the raw on-disk JSON.
    pub fn collection<T>(&self, name: impl Into<String>) -> Collection<T>
    where
        T: Serialize + DeserializeOwned,
    {
        Collection {
            store: self.clone(),
            name: name.into(),
            _marker: PhantomData,
        }
    }

    // ---- reads ----

    /// All records in `collection`, in insertion order. An absent collection
    /// is an empty list, not an error.
    pub fn list_all(&self, collection: &str) -> Result<Vec<Fields>> {
        let _guard = self.lock.read();
        let db = load(&self.path)?;
        Ok(db.get(collection).cloned().unwrap_or_default())
    }

    /// The first record in `collection` whose `id` matches, or `None` when
    /// the collection or record does not exist.
    pub fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Fields>> {
        let _guard = self.lock.read();
        let db = load(&self.path)?;
        Ok(db
            .get(collection)
            .and_then(|records| records.iter().find(|r| record_id(r) == Some(id)).cloned()))
    }

    // ---- writes ----

    /// Append `record` to `collection` (creating the collection on first
    /// use), persist, and return the stored record unchanged.
    ///
    /// The record must carry a non-empty string `id`
    /// ([`Error::MissingId`] otherwise), and that `id` must not already exist
    /// in the collection ([`Error::DuplicateId`]). Nothing is written when
    /// either check fails.
    pub fn create(&self, collection: &str, record: Fields) -> Result<Fields> {
        let id = match record_id(&record) {
            Some(id) if !id.is_empty() => id.to_owned(),
            _ => return Err(Error::MissingId),
        };
        let _guard = self.lock.write();
        let mut db = load(&self.path)?;
        let records = db.entry(collection.to_owned()).or_default();
        if records.iter().any(|r| record_id(r) == Some(id.as_str())) {
            return Err(Error::DuplicateId(id));
        }
        records.push(record.clone());
        self.persist(&db)?;
        Ok(record)
    }

    /// Shallow-merge `patch` into the record with the given `id`: patch
    /// fields overwrite, fields absent from the patch are preserved, and `id`
    /// only changes if the patch itself carries one. Returns the merged
    /// record, or `None` (without writing) when no record matches.
    pub fn update(&self, collection: &str, id: &str, patch: &Fields) -> Result<Option<Fields>> {
        let _guard = self.lock.write();
        let mut db = load(&self.path)?;
        let Some(records) = db.get_mut(collection) else {
            return Ok(None);
        };
        let Some(record) = records.iter_mut().find(|r| record_id(r) == Some(id)) else {
            return Ok(None);
        };
        for (key, value) in patch {
            record.insert(key.clone(), value.clone());
        }
        let merged = record.clone();
        self.persist(&db)?;
        Ok(Some(merged))
    }

    /// Remove the first record with the given `id`. Returns `true` and
    /// persists on removal, `false` (without writing) when the collection or
    /// record does not exist.
    pub fn delete_by_id(&self, collection: &str, id: &str) -> Result<bool> {
        let _guard = self.lock.write();
        let mut db = load(&self.path)?;
        let Some(records) = db.get_mut(collection) else {
            return Ok(false);
        };
        let Some(pos) = records.iter().position(|r| record_id(r) == Some(id)) else {
            return Ok(false);
        };
        records.remove(pos);
        self.persist(&db)?;
        Ok(true)
    }

    // ---- internal ----

    fn persist(&self, db: &Database) -> Result<()> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(db)
        } else {
            serde_json::to_vec(db)
        }
        .map_err(|e| Error::Serialize(e.to_string()))?;
        atomic_write(&self.path, &bytes)
    }
}

impl std::fmt::Debug for DocStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocStore")
            .field("path", &self.path)
            .field("pretty", &self.pretty)
            .finish_non_exhaustive()
    }
}

/// Duplicate ids cannot be created through this store, but a hand-edited file
/// may contain them; lookups consistently take the first match in insertion
/// order.
fn record_id(record: &Fields) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`DocStore`].
///
/// ```rust,no_run
/// use docstore::DocStore;
///
/// let store = DocStore::builder("db.json").pretty(false).build().unwrap();
/// ```
pub struct DocStoreBuilder {
    path: PathBuf,
    pretty: bool,
}

impl DocStoreBuilder {
    fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty: true,
        }
    }

    /// Write human-readable JSON with indentation (default: `true`, so the
    /// backing file stays inspectable by hand).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// Open the store, creating the backing file (as `{}`) if it does not
    /// exist yet. Fails if the file exists but cannot be read or parsed.
    pub fn build(self) -> Result<DocStore> {
        let store = DocStore {
            lock: lock::for_path(&self.path),
            path: self.path,
            pretty: self.pretty,
        };
        // Surfaces unreadable paths and corrupt files at open time rather
        // than on the first operation.
        {
            let _guard = store.lock.read();
            load(&store.path)?;
        }
        Ok(store)
    }
}

impl std::fmt::Debug for DocStoreBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocStoreBuilder")
            .field("path", &self.path)
            .field("pretty", &self.pretty)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Typed collection view
// ---------------------------------------------------------------------------

/// Typed view of one named collection, created via
/// [`DocStore::collection`].
///
/// `T` is the caller's record type; it must serialize to a JSON object with a
/// non-empty string `id`. Updates accept any serializable patch shape and
/// merge it field-by-field into the raw stored JSON, so stored fields outside
/// `T` are preserved.
pub struct Collection<T> {
    store: DocStore,
    name: String,
    _marker: PhantomData<T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Name of the underlying collection.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All records, in insertion order.
    pub fn list(&self) -> Result<Vec<T>> {
        self.store
            .list_all(&self.name)?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// The record with the given `id`, or `None`.
    pub fn get(&self, id: &str) -> Result<Option<T>> {
        self.store.get_by_id(&self.name, id)?.map(decode).transpose()
    }

    /// Persist a new record. Same id rules as [`DocStore::create`].
    pub fn create(&self, record: &T) -> Result<T> {
        let fields = encode(record)?;
        self.store.create(&self.name, fields).and_then(decode)
    }

    /// Shallow-merge `patch` into the record with the given `id`. Returns the
    /// merged record, or `None` when no record matches.
    pub fn update<P: Serialize>(&self, id: &str, patch: &P) -> Result<Option<T>> {
        let fields = encode(patch)?;
        self.store
            .update(&self.name, id, &fields)?
            .map(decode)
            .transpose()
    }

    /// Remove the record with the given `id`. Returns `false` when no record
    /// matches.
    pub fn delete(&self, id: &str) -> Result<bool> {
        self.store.delete_by_id(&self.name, id)
    }
}

impl<T> std::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("store", &self.store)
            .finish()
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Fields> {
    match serde_json::to_value(value).map_err(|e| Error::Serialize(e.to_string()))? {
        Value::Object(fields) => Ok(fields),
        _ => Err(Error::Serialize(
            "record must serialize to a JSON object".to_owned(),
        )),
    }
}

fn decode<T: DeserializeOwned>(fields: Fields) -> Result<T> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| Error::Corrupt(e.to_string()))
}
