use std::path::Path;

use rocksdb::{
    ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded, Options, WriteBatch,
};

use crate::error::{StorageError, StorageResult};
use crate::message::MessageId;
use crate::storage::traits::Storage;

const CF_LEDGER: &str = "ledger";
const CF_STATE: &str = "state";

/// All column family names (excluding `default` which RocksDB creates automatically).
const COLUMN_FAMILIES: &[&str] = &[CF_LEDGER, CF_STATE];

/// State CF key holding the bootstrap flag.
const SEEDED_KEY: &[u8] = b"seeded";

type DB = DBWithThreadMode<MultiThreaded>;

/// RocksDB-backed storage. Ledger keys are the raw id bytes with empty
/// values; the state CF holds the seeded flag.
pub struct RocksDbStorage {
    db: DB,
}

impl RocksDbStorage {
    /// Open or create a RocksDB database at the given path with all column families.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect();

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;
        Ok(Self { db })
    }

    fn cf(&self, name: &str) -> StorageResult<std::sync::Arc<rocksdb::BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StorageError::RocksDb(format!("column family not found: {name}")))
    }
}

impl Storage for RocksDbStorage {
    fn ledger_contains(&self, id: &MessageId) -> StorageResult<bool> {
        let cf = self.cf(CF_LEDGER)?;
        Ok(self.db.get_cf(&cf, id.as_str().as_bytes())?.is_some())
    }

    fn ledger_insert(&self, id: &MessageId) -> StorageResult<()> {
        let cf = self.cf(CF_LEDGER)?;
        self.db.put_cf(&cf, id.as_str().as_bytes(), b"")?;
        Ok(())
    }

    fn ledger_insert_all(&self, ids: &[MessageId]) -> StorageResult<()> {
        let cf = self.cf(CF_LEDGER)?;
        let mut batch = WriteBatch::default();
        for id in ids {
            batch.put_cf(&cf, id.as_str().as_bytes(), b"");
        }
        self.db.write(batch)?;
        Ok(())
    }

    fn ledger_delete_all(&self, ids: &[MessageId]) -> StorageResult<()> {
        let cf = self.cf(CF_LEDGER)?;
        let mut batch = WriteBatch::default();
        for id in ids {
            batch.delete_cf(&cf, id.as_str().as_bytes());
        }
        self.db.write(batch)?;
        Ok(())
    }

    fn ledger_ids(&self) -> StorageResult<Vec<MessageId>> {
        let cf = self.cf(CF_LEDGER)?;
        let mut ids = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (key, _) = item?;
            ids.push(MessageId::from_raw(String::from_utf8_lossy(&key).into_owned()));
        }
        Ok(ids)
    }

    fn ledger_len(&self) -> StorageResult<usize> {
        let cf = self.cf(CF_LEDGER)?;
        let mut count = 0;
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            item?;
            count += 1;
        }
        Ok(count)
    }

    fn seeded(&self) -> StorageResult<bool> {
        let cf = self.cf(CF_STATE)?;
        Ok(self.db.get_cf(&cf, SEEDED_KEY)?.is_some())
    }

    fn seed(&self, ids: &[MessageId]) -> StorageResult<()> {
        let ledger = self.cf(CF_LEDGER)?;
        let state = self.cf(CF_STATE)?;
        let mut batch = WriteBatch::default();
        for id in ids {
            batch.put_cf(&ledger, id.as_str().as_bytes(), b"");
        }
        batch.put_cf(&state, SEEDED_KEY, b"1");
        self.db.write(batch)?;
        Ok(())
    }
}
