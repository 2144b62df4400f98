//! Persistence manager for table data files and the manifest sidecar.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

use crc32fast::Hasher;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::record::{Account, Record, Student};
use crate::registry::Registry;
use crate::table::Table;

use super::io_utils::{classify_io_error, retry_io_operation};
use super::manifest::ManifestFile;

/// Manifest format version written by this build.
const MANIFEST_VERSION: u32 = 1;

/// Persistence manager for table data files and the manifest sidecar.
#[derive(Debug)]
pub struct PersistenceManager {
    /// Data directory path
    data_dir: PathBuf,
    /// Per-table record capacity for restored tables
    table_capacity: usize,
    /// Maximum retry attempts for transient I/O errors
    max_retries: u32,
    /// Delay between retry attempts in milliseconds
    retry_delay_ms: u64,
}

impl PersistenceManager {
    /// Creates a new persistence manager with the given configuration.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            table_capacity: config.table_capacity,
            max_retries: config.persistence_max_retries,
            retry_delay_ms: config.persistence_retry_delay_ms,
        }
    }

    /// Loads both tables from disk and assembles a registry.
    ///
    /// Missing files load as empty tables, matching a first start against
    /// an empty data directory.
    pub fn load(&self) -> Result<Registry, StoreError> {
        let manifest = self.read_manifest()?;
        let accounts: Table<Account> = self.load_table(&manifest)?;
        let students: Table<Student> = self.load_table(&manifest)?;
        tracing::debug!(
            "loaded {} accounts and {} students from {}",
            accounts.count(),
            students.count(),
            self.data_dir.display()
        );
        Ok(Registry::from_tables(accounts, students))
    }

    /// Saves both tables and refreshes the manifest.
    ///
    /// Each data file is overwritten wholesale; the last write wins.
    pub fn save(&self, registry: &Registry) -> Result<(), StoreError> {
        let mut manifest = ManifestFile {
            version: MANIFEST_VERSION,
            ..Default::default()
        };

        let checksum = self.save_table(registry.accounts())?;
        manifest.checksums.insert(Account::KIND.to_string(), checksum);
        let checksum = self.save_table(registry.students())?;
        manifest.checksums.insert(Student::KIND.to_string(), checksum);

        self.write_manifest(&manifest)?;
        tracing::debug!(
            "saved {} accounts and {} students to {}",
            registry.accounts().count(),
            registry.students().count(),
            self.data_dir.display()
        );
        Ok(())
    }

    fn data_file(&self, kind: &str) -> PathBuf {
        self.data_dir.join("data").join(format!("{}.txt", kind))
    }

    fn manifest_file(&self) -> PathBuf {
        self.data_dir.join("manifest.json")
    }

    /// Loads one table's data file, verifying its checksum when the
    /// manifest carries one.
    fn load_table<R: Record>(&self, manifest: &ManifestFile) -> Result<Table<R>, StoreError> {
        let path = self.data_file(R::KIND);
        if !path.exists() {
            // No data file, the table starts empty
            return Table::restore(Vec::new(), self.table_capacity);
        }

        let mut file =
            File::open(&path).map_err(|e| classify_io_error(e, "Failed to open data file"))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| classify_io_error(e, "Failed to read data file"))?;

        if let Some(expected) = manifest.checksums.get(R::KIND) {
            let mut hasher = Hasher::new();
            hasher.update(contents.as_bytes());
            let actual = hasher.finalize();
            if actual != *expected {
                return Err(StoreError::DataCorruption(format!(
                    "Checksum mismatch for table '{}': expected {:08x}, got {:08x}",
                    R::KIND,
                    expected,
                    actual
                )));
            }
        }

        let mut records = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            let record = R::decode(line).map_err(|e| match e {
                StoreError::MalformedRecord { kind, reason } => StoreError::MalformedRecord {
                    kind,
                    reason: format!("line {}: {}", line_no + 1, reason),
                },
                other => other,
            })?;
            records.push(record);
        }

        Table::restore(records, self.table_capacity)
    }

    /// Encodes one table and overwrites its data file. Returns the CRC32
    /// of the written bytes.
    fn save_table<R: Record>(&self, table: &Table<R>) -> Result<u32, StoreError> {
        retry_io_operation(
            || self.save_table_internal(table),
            self.max_retries,
            self.retry_delay_ms,
            "save_table",
        )
    }

    fn save_table_internal<R: Record>(&self, table: &Table<R>) -> Result<u32, StoreError> {
        let data_dir = self.data_dir.join("data");
        fs::create_dir_all(&data_dir)
            .map_err(|e| classify_io_error(e, "Failed to create data directory"))?;

        let mut encoded = String::new();
        for record in table.iter() {
            encoded.push_str(&record.encode());
            encoded.push('\n');
        }

        let mut hasher = Hasher::new();
        hasher.update(encoded.as_bytes());
        let checksum = hasher.finalize();

        let temp_path = data_dir.join(format!("{}.txt.tmp", R::KIND));
        let final_path = data_dir.join(format!("{}.txt", R::KIND));

        // Write to a temporary file, then atomically rename into place
        let mut file = File::create(&temp_path)
            .map_err(|e| classify_io_error(e, "Failed to create temp file"))?;
        file.write_all(encoded.as_bytes())
            .map_err(|e| classify_io_error(e, "Failed to write data"))?;
        file.sync_all()
            .map_err(|e| classify_io_error(e, "Failed to sync data"))?;
        fs::rename(&temp_path, &final_path)
            .map_err(|e| classify_io_error(e, "Failed to rename data file"))?;

        Ok(checksum)
    }

    /// Reads the manifest, tolerating a missing file.
    fn read_manifest(&self) -> Result<ManifestFile, StoreError> {
        let path = self.manifest_file();
        if !path.exists() {
            // No manifest yet, checksum verification is skipped
            return Ok(ManifestFile::default());
        }

        let mut file =
            File::open(&path).map_err(|e| classify_io_error(e, "Failed to open manifest"))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| classify_io_error(e, "Failed to read manifest"))?;

        let manifest: ManifestFile = serde_json::from_str(&contents).map_err(|e| {
            StoreError::SerializationError(format!("Failed to parse manifest: {}", e))
        })?;
        if manifest.version != MANIFEST_VERSION {
            return Err(StoreError::SerializationError(format!(
                "Unsupported manifest version: {}",
                manifest.version
            )));
        }
        Ok(manifest)
    }

    fn write_manifest(&self, manifest: &ManifestFile) -> Result<(), StoreError> {
        retry_io_operation(
            || self.write_manifest_internal(manifest),
            self.max_retries,
            self.retry_delay_ms,
            "write_manifest",
        )
    }

    fn write_manifest_internal(&self, manifest: &ManifestFile) -> Result<(), StoreError> {
        let manifest_json = serde_json::to_string_pretty(manifest)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;

        fs::create_dir_all(&self.data_dir)
            .map_err(|e| classify_io_error(e, "Failed to create data directory"))?;

        let temp_path = self.data_dir.join("manifest.json.tmp");
        let final_path = self.manifest_file();

        let mut file = File::create(&temp_path)
            .map_err(|e| classify_io_error(e, "Failed to create temp file"))?;
        file.write_all(manifest_json.as_bytes())
            .map_err(|e| classify_io_error(e, "Failed to write manifest"))?;
        file.sync_all()
            .map_err(|e| classify_io_error(e, "Failed to sync manifest"))?;
        fs::rename(&temp_path, &final_path)
            .map_err(|e| classify_io_error(e, "Failed to rename manifest file"))?;

        Ok(())
    }
}
