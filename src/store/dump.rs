use super::{StoreError, StoreResult};
use crate::model::{
    Agreement, Alert, HostDataSummary, LmsHostRecord, OracleDatabasePartitioning, PgsqlMigrability,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Full content of an inventory, as exported from the document store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryDump {
    pub hosts: Vec<HostDataSummary>,
    pub lms_hosts: Vec<LmsHostRecord>,
    pub agreements: Vec<Agreement>,
    pub migrabilities: Vec<DatabaseMigrabilities>,
    pub partitionings: Vec<DatabasePartitionings>,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseMigrabilities {
    pub hostname: String,
    pub dbname: String,
    pub metrics: Vec<PgsqlMigrability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabasePartitionings {
    pub hostname: String,
    pub dbname: String,
    pub partitionings: Vec<OracleDatabasePartitioning>,
}

/// Reads and writes inventory dumps, optionally gzip compressed
pub struct DumpLoader {
    compress: bool,
}

impl Default for DumpLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DumpLoader {
    pub fn new() -> Self {
        Self { compress: false }
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Save a dump to a file. The content goes to a temporary file next to
    /// `path` which then replaces it, so readers never see a partial dump.
    pub fn save(&self, dump: &InventoryDump, path: &Path) -> StoreResult<()> {
        info!("Saving inventory dump to {:?}", path);

        let json_data = serde_json::to_vec_pretty(dump)?;

        let bytes = if self.compress {
            let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(&json_data)?;
            let compressed = encoder
                .finish()
                .map_err(|e| StoreError::Compression(e.to_string()))?;

            debug!("Dump compressed from {} to {} bytes", json_data.len(), compressed.len());
            compressed
        } else {
            json_data
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;

        Ok(())
    }

    /// Load a dump, detecting gzip compression from the file header
    pub fn load(&self, path: &Path) -> StoreResult<InventoryDump> {
        info!("Loading inventory dump from {:?}", path);

        let mut file = File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;

        let json_data = if is_compressed(&buffer) {
            let mut decoder = flate2::read::GzDecoder::new(&buffer[..]);
            let mut decompressed = Vec::new();
            decoder
                .read_to_end(&mut decompressed)
                .map_err(|e| StoreError::Compression(e.to_string()))?;
            decompressed
        } else {
            buffer
        };

        let dump: InventoryDump = serde_json::from_slice(&json_data)?;

        info!(
            "Loaded {} host snapshots, {} agreements, {} alerts",
            dump.hosts.len(),
            dump.agreements.len(),
            dump.alerts.len()
        );
        Ok(dump)
    }
}

/// Gzip magic numbers: 1f 8b
fn is_compressed(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_dump() -> InventoryDump {
        serde_json::from_value(serde_json::json!({
            "hosts": [{
                "id": "1",
                "hostname": "db01",
                "createdAt": "2024-03-01T10:00:00Z",
                "info": {"hardwareAbstractionTechnology": "VMWARE"}
            }],
            "agreements": [{
                "id": "a1",
                "csi": "6871235",
                "hosts": [{"hostname": "db01"}]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_load_plain_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.json");
        DumpLoader::new().save(&sample_dump(), &path).unwrap();

        let dump = DumpLoader::new().load(&path).unwrap();
        assert_eq!(dump.hosts.len(), 1);
        assert_eq!(dump.agreements[0].csi, "6871235");
        assert!(dump.alerts.is_empty());
    }

    #[test]
    fn test_load_detects_gzip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.json.gz");
        DumpLoader::new().with_compression(true).save(&sample_dump(), &path).unwrap();

        let raw = std::fs::read(&path).unwrap();
        assert!(is_compressed(&raw));

        let dump = DumpLoader::new().load(&path).unwrap();
        assert_eq!(dump.hosts[0].hostname, "db01");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = DumpLoader::new().load(&dir.path().join("missing.json")).unwrap_err();
        assert_eq!(err.code(), "IO");
    }

    #[test]
    fn test_save_replaces_existing_dump() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.json");
        std::fs::write(&path, b"{\"hosts\": []}").unwrap();

        DumpLoader::new().save(&sample_dump(), &path).unwrap();

        let dump = DumpLoader::new().load(&path).unwrap();
        assert_eq!(dump.hosts.len(), 1);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_into_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("inventory.json");

        let err = DumpLoader::new().save(&sample_dump(), &path).unwrap_err();
        assert_eq!(err.code(), "IO");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
