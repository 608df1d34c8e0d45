use super::dump::{DumpLoader, InventoryDump};
use super::{AlertService, InventoryStore, StoreError, StoreResult};
use crate::model::{
    Agreement, AlertStatus, AlertsFilter, HostDataSummary, LmsHostRecord,
    OracleDatabasePartitioning, PgsqlMigrability, SearchHostsFilters, MAX_TIME,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Inventory store kept in memory, loaded from an exported dump
pub struct MemoryStore {
    dump: RwLock<InventoryDump>,
}

impl MemoryStore {
    pub fn new(dump: InventoryDump) -> Self {
        Self {
            dump: RwLock::new(dump),
        }
    }

    /// Load the store from a (possibly gzip compressed) dump file
    pub fn from_file(path: &Path) -> StoreResult<Self> {
        let dump = DumpLoader::new().load(path)?;
        Ok(Self::new(dump))
    }

    /// Copy of the current content, e.g. to write it back to disk
    pub async fn snapshot(&self) -> InventoryDump {
        self.dump.read().await.clone()
    }
}

/// Latest non-archived snapshot per hostname not newer than `older_than`,
/// ordered by hostname
fn current_hosts(hosts: &[HostDataSummary], older_than: DateTime<Utc>) -> Vec<&HostDataSummary> {
    let mut latest: HashMap<&str, &HostDataSummary> = HashMap::new();
    for host in hosts.iter().filter(|h| !h.archived && h.created_at <= older_than) {
        latest
            .entry(host.hostname.as_str())
            .and_modify(|current| {
                if host.created_at > current.created_at {
                    *current = host;
                }
            })
            .or_insert(host);
    }

    let mut result: Vec<&HostDataSummary> = latest.into_values().collect();
    result.sort_by(|a, b| a.hostname.cmp(&b.hostname));
    result
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Every non-empty keyword must appear in at least one searchable field
fn matches_keywords(host: &HostDataSummary, keywords: &[String]) -> bool {
    keywords.iter().filter(|k| !k.is_empty()).all(|keyword| {
        contains_ignore_case(&host.hostname, keyword)
            || contains_ignore_case(&host.environment, keyword)
            || contains_ignore_case(&host.location, keyword)
            || host
                .databases
                .values()
                .flatten()
                .any(|db| contains_ignore_case(db, keyword))
    })
}

fn matches_filters(host: &HostDataSummary, filters: &SearchHostsFilters) -> bool {
    let global = &filters.global_filter;
    if !global.location.is_empty() && host.location != global.location {
        return false;
    }
    if !global.environment.is_empty() && host.environment != global.environment {
        return false;
    }
    if !filters.hostname.is_empty() && !contains_ignore_case(&host.hostname, &filters.hostname) {
        return false;
    }
    if !filters.database.is_empty()
        && !host
            .databases
            .values()
            .flatten()
            .any(|db| contains_ignore_case(db, &filters.database))
    {
        return false;
    }
    if !filters.technology.is_empty()
        && !host
            .databases
            .keys()
            .any(|t| contains_ignore_case(t, &filters.technology))
    {
        return false;
    }
    if !filters.hardware_abstraction_technology.is_empty()
        && host.info.hardware_abstraction_technology != filters.hardware_abstraction_technology
    {
        return false;
    }
    if !filters.cluster.is_empty() && host.cluster != filters.cluster {
        return false;
    }
    if !filters.virtualization_node.is_empty() && host.virtualization_node != filters.virtualization_node {
        return false;
    }
    if !filters.operating_system.is_empty() && !contains_ignore_case(&host.info.os, &filters.operating_system) {
        return false;
    }
    if !filters.kernel.is_empty() && !contains_ignore_case(&host.info.kernel, &filters.kernel) {
        return false;
    }
    matches_keywords(host, &filters.search)
}

fn compare_hosts(a: &HostDataSummary, b: &HostDataSummary, sort_by: &str) -> Ordering {
    match sort_by {
        "createdAt" => a.created_at.cmp(&b.created_at),
        "environment" => a.environment.cmp(&b.environment),
        "location" => a.location.cmp(&b.location),
        _ => a.hostname.cmp(&b.hostname),
    }
}

fn directed(ordering: Ordering, sort_desc: bool) -> Ordering {
    if sort_desc {
        ordering.reverse()
    } else {
        ordering
    }
}

fn sort_hosts(hosts: &mut [&HostDataSummary], sort_by: &str, sort_desc: bool) {
    if sort_by.is_empty() {
        return;
    }
    hosts.sort_by(|a, b| directed(compare_hosts(a, b, sort_by), sort_desc));
}

/// Apply zero based pagination when both values are meaningful.
/// A page starting past the addressable range is empty.
fn paginate<T>(items: Vec<T>, page: i64, page_size: i64) -> Vec<T> {
    if page < 0 || page_size <= 0 {
        return items;
    }
    let offset = page.checked_mul(page_size).and_then(|o| usize::try_from(o).ok());
    let (Some(offset), Ok(take)) = (offset, usize::try_from(page_size)) else {
        return Vec::new();
    };
    items.into_iter().skip(offset).take(take).collect()
}

fn host_summary_document(host: &HostDataSummary) -> serde_json::Value {
    let mut technologies: Vec<&String> = host.databases.keys().collect();
    technologies.sort();
    json!({
        "id": host.id,
        "hostname": host.hostname,
        "location": host.location,
        "environment": host.environment,
        "createdAt": host.created_at,
        "os": host.info.os,
        "kernel": host.info.kernel,
        "hardwareAbstractionTechnology": host.info.hardware_abstraction_technology,
        "technologies": technologies,
    })
}

fn alert_matches(alert: &crate::model::Alert, filter: &AlertsFilter) -> bool {
    if let Some(ref technology) = filter.alert_type {
        if alert.alert_affected_technology.as_deref() != Some(technology.as_str()) {
            return false;
        }
    }
    if let Some(ref category) = filter.alert_category {
        if &alert.alert_category != category {
            return false;
        }
    }
    if let Some(ref severity) = filter.alert_severity {
        if &alert.alert_severity != severity {
            return false;
        }
    }
    if let Some(status) = filter.alert_status {
        if alert.alert_status != status {
            return false;
        }
    }
    filter
        .other_info
        .iter()
        .all(|(key, value)| alert.other_info.get(key) == Some(value))
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn search_host_summaries(&self, filters: &SearchHostsFilters) -> StoreResult<Vec<HostDataSummary>> {
        let dump = self.dump.read().await;
        let mut hosts: Vec<&HostDataSummary> = current_hosts(&dump.hosts, filters.global_filter.older_than)
            .into_iter()
            .filter(|h| matches_filters(h, filters))
            .collect();
        sort_hosts(&mut hosts, &filters.sort_by, filters.sort_desc);

        let hosts: Vec<HostDataSummary> = hosts.into_iter().cloned().collect();
        debug!("Host summary search matched {} hosts", hosts.len());
        Ok(paginate(hosts, filters.page_number, filters.page_size))
    }

    async fn search_lms_hosts(&self, filters: &SearchHostsFilters) -> StoreResult<Vec<LmsHostRecord>> {
        let dump = self.dump.read().await;
        let global = &filters.global_filter;

        // Rows are filtered through the host they were projected from
        let hosts: HashMap<&str, &HostDataSummary> = current_hosts(&dump.hosts, global.older_than)
            .into_iter()
            .filter(|h| matches_filters(h, filters))
            .map(|h| (h.hostname.as_str(), h))
            .collect();

        let mut rows: Vec<(&LmsHostRecord, &HostDataSummary)> = dump
            .lms_hosts
            .iter()
            .filter(|row| row.created_at <= global.older_than)
            .filter_map(|row| hosts.get(row.hostname()).map(|host| (row, *host)))
            .collect();

        if !filters.sort_by.is_empty() {
            rows.sort_by(|(_, a), (_, b)| directed(compare_hosts(a, b, &filters.sort_by), filters.sort_desc));
        }

        let rows: Vec<LmsHostRecord> = rows.into_iter().map(|(row, _)| row.clone()).collect();
        debug!("LMS search matched {} rows", rows.len());
        Ok(paginate(rows, filters.page_number, filters.page_size))
    }

    async fn search_hostnames(&self, filters: &SearchHostsFilters) -> StoreResult<Vec<String>> {
        let hosts = self.search_host_summaries(filters).await?;
        Ok(hosts.into_iter().map(|h| h.hostname).collect())
    }

    async fn get_host(&self, hostname: &str, older_than: DateTime<Utc>, raw: bool) -> StoreResult<serde_json::Value> {
        let dump = self.dump.read().await;
        let host = current_hosts(&dump.hosts, older_than)
            .into_iter()
            .find(|h| h.hostname == hostname)
            .ok_or_else(|| StoreError::HostNotFound(hostname.to_string()))?;

        let mut document = serde_json::to_value(host)?;
        if raw {
            return Ok(document);
        }

        let alerts: Vec<&crate::model::Alert> = dump
            .alerts
            .iter()
            .filter(|a| a.alert_status == AlertStatus::New && a.hostname() == Some(hostname))
            .collect();

        let mut history: Vec<&HostDataSummary> = dump.hosts.iter().filter(|h| h.hostname == hostname).collect();
        history.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let history: Vec<serde_json::Value> = history
            .into_iter()
            .map(|h| json!({ "id": h.id, "createdAt": h.created_at }))
            .collect();

        if let Some(object) = document.as_object_mut() {
            object.insert("alerts".to_string(), serde_json::to_value(alerts)?);
            object.insert("history".to_string(), serde_json::Value::Array(history));
        }
        Ok(document)
    }

    async fn list_locations(&self, location: &str, environment: &str, older_than: DateTime<Utc>) -> StoreResult<Vec<String>> {
        let dump = self.dump.read().await;
        let locations: BTreeSet<String> = current_hosts(&dump.hosts, older_than)
            .into_iter()
            .filter(|h| location.is_empty() || h.location == location)
            .filter(|h| environment.is_empty() || h.environment == environment)
            .map(|h| h.location.clone())
            .collect();
        Ok(locations.into_iter().collect())
    }

    async fn list_environments(&self, location: &str, environment: &str, older_than: DateTime<Utc>) -> StoreResult<Vec<String>> {
        let dump = self.dump.read().await;
        let environments: BTreeSet<String> = current_hosts(&dump.hosts, older_than)
            .into_iter()
            .filter(|h| location.is_empty() || h.location == location)
            .filter(|h| environment.is_empty() || h.environment == environment)
            .map(|h| h.environment.clone())
            .collect();
        Ok(environments.into_iter().collect())
    }

    async fn archive_host(&self, hostname: &str) -> StoreResult<()> {
        let mut dump = self.dump.write().await;
        let mut archived = 0;
        for host in dump.hosts.iter_mut().filter(|h| h.hostname == hostname && !h.archived) {
            host.archived = true;
            archived += 1;
        }

        if archived == 0 {
            return Err(StoreError::HostNotFound(hostname.to_string()));
        }
        info!("Archived {} snapshots of host {}", archived, hostname);
        Ok(())
    }

    async fn list_agreements(&self) -> StoreResult<Vec<Agreement>> {
        Ok(self.dump.read().await.agreements.clone())
    }

    async fn find_psql_migrabilities(&self, hostname: &str, dbname: &str) -> StoreResult<Vec<PgsqlMigrability>> {
        let dump = self.dump.read().await;
        Ok(dump
            .migrabilities
            .iter()
            .find(|m| m.hostname == hostname && m.dbname == dbname)
            .map(|m| m.metrics.clone())
            .unwrap_or_default())
    }

    async fn find_partitionings(&self, hostname: &str, dbname: &str) -> StoreResult<Vec<OracleDatabasePartitioning>> {
        let dump = self.dump.read().await;
        Ok(dump
            .partitionings
            .iter()
            .find(|p| p.hostname == hostname && p.dbname == dbname)
            .map(|p| p.partitionings.clone())
            .unwrap_or_default())
    }

    async fn search_current_hosts(
        &self,
        full: bool,
        keywords: &[String],
        sort_by: &str,
        sort_desc: bool,
        page: i64,
        page_size: i64,
    ) -> StoreResult<Vec<serde_json::Value>> {
        let dump = self.dump.read().await;
        let mut hosts: Vec<&HostDataSummary> = current_hosts(&dump.hosts, MAX_TIME)
            .into_iter()
            .filter(|h| matches_keywords(h, keywords))
            .collect();
        sort_hosts(&mut hosts, sort_by, sort_desc);

        let documents = hosts
            .into_iter()
            .map(|h| {
                if full {
                    serde_json::to_value(h)
                } else {
                    Ok(host_summary_document(h))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(paginate(documents, page, page_size))
    }

    async fn get_current_host(&self, hostname: &str) -> StoreResult<serde_json::Value> {
        self.get_host(hostname, MAX_TIME, false).await
    }
}

#[async_trait]
impl AlertService for MemoryStore {
    async fn ack_alerts(&self, filter: &AlertsFilter) -> StoreResult<u64> {
        let mut dump = self.dump.write().await;
        let mut acknowledged = 0;
        for alert in dump
            .alerts
            .iter_mut()
            .filter(|a| a.alert_status == AlertStatus::New && alert_matches(a, filter))
        {
            alert.alert_status = AlertStatus::Ack;
            acknowledged += 1;
        }

        debug!("Acknowledged {} alerts", acknowledged);
        Ok(acknowledged)
    }
}
