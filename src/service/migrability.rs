use super::{InventoryService, ServiceResult};
use crate::analyzers::{classify, Semaphore};
use crate::model::{OracleDatabasePartitioning, PgsqlMigrability};
use tracing::debug;

impl InventoryService {
    pub async fn get_oracle_psql_migrabilities(&self, hostname: &str, dbname: &str) -> ServiceResult<Vec<PgsqlMigrability>> {
        Ok(self.store.find_psql_migrabilities(hostname, dbname).await?)
    }

    /// Classify how hard moving the database to PostgreSQL would be
    pub async fn get_oracle_psql_migrabilities_semaphore(&self, hostname: &str, dbname: &str) -> ServiceResult<Semaphore> {
        let metrics = self.store.find_psql_migrabilities(hostname, dbname).await?;
        let semaphore = classify(&metrics);

        debug!("Migrability of {}/{}: {}", hostname, dbname, semaphore);
        Ok(semaphore)
    }

    pub async fn get_oracle_database_partitionings(
        &self,
        hostname: &str,
        dbname: &str,
    ) -> ServiceResult<Vec<OracleDatabasePartitioning>> {
        Ok(self.store.find_partitionings(hostname, dbname).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::service::test_support::{memory_store, service_with, FailingStore, StaticTemplates};
    use serde_json::json;
    use std::sync::Arc;

    fn inventory() -> serde_json::Value {
        json!({
            "migrabilities": [
                {"hostname": "hostname01", "dbname": "dbname01", "metrics": [
                    {"metric": "PLSQL LINES", "count": 0, "schema": "test_schema", "objectType": "test_objectType"},
                    {"metric": "NO PLSQL LINES", "count": 0, "schema": "test_schema", "objectType": "test_objectType"}
                ]},
                {"hostname": "hostname02", "dbname": "dbname02", "metrics": [
                    {"metric": "PLSQL LINES", "count": 1000, "schema": "test_schema", "objectType": "test_objectType"},
                    {"metric": "NO PLSQL LINES", "count": 0, "schema": "test_schema", "objectType": "test_objectType"}
                ]},
                {"hostname": "hostname03", "dbname": "dbname03", "metrics": [
                    {"metric": "PLSQL LINES", "count": 10001, "schema": "test_schema", "objectType": "test_objectType"},
                    {"metric": "NO PLSQL LINES", "count": 0, "schema": "test_schema", "objectType": "test_objectType"}
                ]}
            ],
            "partitionings": [
                {"hostname": "hostname01", "dbname": "dbname01", "partitionings": [
                    {"owner": "SALES", "segmentName": "ORDERS", "partitionName": "P2024",
                     "segmentType": "TABLE PARTITION", "mb": 512.5}
                ]}
            ]
        })
    }

    #[tokio::test]
    async fn test_get_migrabilities() {
        let service = service_with(memory_store(inventory()), None);
        let metrics = service
            .get_oracle_psql_migrabilities("hostname02", "dbname02")
            .await
            .unwrap();

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].metric.as_deref(), Some("PLSQL LINES"));
        assert_eq!(metrics[0].count, 1000);
        assert_eq!(metrics[0].schema.as_deref(), Some("test_schema"));
    }

    #[tokio::test]
    async fn test_semaphore_labels() {
        let service = service_with(memory_store(inventory()), None);

        let res = service
            .get_oracle_psql_migrabilities_semaphore("hostname01", "dbname01")
            .await
            .unwrap();
        assert_eq!(res.to_string(), "green");

        let res = service
            .get_oracle_psql_migrabilities_semaphore("hostname02", "dbname02")
            .await
            .unwrap();
        assert_eq!(res.to_string(), "yellow");

        let res = service
            .get_oracle_psql_migrabilities_semaphore("hostname03", "dbname03")
            .await
            .unwrap();
        assert_eq!(res.to_string(), "red");
    }

    #[tokio::test]
    async fn test_semaphore_unknown_database_is_green() {
        let service = service_with(memory_store(inventory()), None);
        let res = service
            .get_oracle_psql_migrabilities_semaphore("hostname09", "dbname09")
            .await
            .unwrap();
        assert_eq!(res, Semaphore::Green);
    }

    #[tokio::test]
    async fn test_semaphore_propagates_store_failure() {
        let service = InventoryService::new(
            Arc::new(FailingStore),
            memory_store(json!({})),
            Arc::new(StaticTemplates(None)),
            ServiceConfig::default(),
        );
        let err = service
            .get_oracle_psql_migrabilities_semaphore("hostname01", "dbname01")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "QUERY");
    }

    #[tokio::test]
    async fn test_get_partitionings() {
        let service = service_with(memory_store(inventory()), None);
        let partitionings = service
            .get_oracle_database_partitionings("hostname01", "dbname01")
            .await
            .unwrap();
        assert_eq!(partitionings.len(), 1);
        assert_eq!(partitionings[0].segment_name, "ORDERS");
        assert_eq!(partitionings[0].mb, 512.5);
    }
}
