use super::{InventoryService, SearchHostsResult, SearchMode, ServiceError, ServiceResult};
use crate::model::{AlertsFilter, HostDataSummary, SearchHostsAsLms, SearchHostsFilters};
use crate::report::{CsiIndex, HostsReporter, LmsReporter, Workbook, LMS_TEMPLATE};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

impl InventoryService {
    /// Search hosts, returning records shaped by `mode`
    pub async fn search_hosts(&self, mode: SearchMode, filters: &SearchHostsFilters) -> ServiceResult<SearchHostsResult> {
        debug!("Searching hosts in {} mode", mode);

        let result = match mode {
            SearchMode::Summary => SearchHostsResult::Summary(self.store.search_host_summaries(filters).await?),
            SearchMode::Lms => SearchHostsResult::Lms(self.store.search_lms_hosts(filters).await?),
            SearchMode::Hostnames => SearchHostsResult::Hostnames(self.store.search_hostnames(filters).await?),
        };
        Ok(result)
    }

    /// Fill the license compliance template with the matching databases
    pub async fn search_hosts_as_lms(&self, filters: &SearchHostsAsLms) -> ServiceResult<Workbook> {
        let records = self.store.search_lms_hosts(&filters.filters).await?;
        let agreements = self.store.list_agreements().await?;
        let csi_index = CsiIndex::from_agreements(&agreements);

        let mut lms = self
            .templates
            .open(LMS_TEMPLATE)
            .map_err(ServiceError::ReadTemplate)?;

        LmsReporter::new(&csi_index).render(&mut lms, &records, filters)?;

        info!(
            "LMS report generated: {} databases, {} hosts with agreements",
            records.len(),
            csi_index.len()
        );
        Ok(lms)
    }

    /// Export the matching hosts as a flat spreadsheet
    pub async fn search_hosts_as_xlsx(&self, filters: &SearchHostsFilters) -> ServiceResult<Workbook> {
        let hosts = self.store.search_host_summaries(filters).await?;
        let file: Workbook = HostsReporter::new().generate(&hosts)?;

        info!("Hosts export generated: {} hosts", hosts.len());
        Ok(file)
    }

    pub async fn get_host_data_summaries(&self, filters: &SearchHostsFilters) -> ServiceResult<Vec<HostDataSummary>> {
        Ok(self.store.search_host_summaries(filters).await?)
    }

    /// Return the host with the given hostname as seen at `older_than`
    pub async fn get_host(&self, hostname: &str, older_than: DateTime<Utc>, raw: bool) -> ServiceResult<serde_json::Value> {
        Ok(self.store.get_host(hostname, older_than, raw).await?)
    }

    pub async fn list_locations(&self, location: &str, environment: &str, older_than: DateTime<Utc>) -> ServiceResult<Vec<String>> {
        Ok(self.store.list_locations(location, environment, older_than).await?)
    }

    pub async fn list_environments(&self, location: &str, environment: &str, older_than: DateTime<Utc>) -> ServiceResult<Vec<String>> {
        Ok(self.store.list_environments(location, environment, older_than).await?)
    }

    /// Keyword search over current hosts; `search` holds space separated keywords
    pub async fn search_current_hosts(
        &self,
        full: bool,
        search: &str,
        sort_by: &str,
        sort_desc: bool,
        page: i64,
        page_size: i64,
    ) -> ServiceResult<Vec<serde_json::Value>> {
        let keywords: Vec<String> = search.split(' ').map(str::to_string).collect();
        Ok(self
            .store
            .search_current_hosts(full, &keywords, sort_by, sort_desc, page, page_size)
            .await?)
    }

    pub async fn get_current_host(&self, hostname: &str) -> ServiceResult<serde_json::Value> {
        Ok(self.store.get_current_host(hostname).await?)
    }

    /// Archive a host. Its open alerts are acknowledged first on a best
    /// effort basis: a failure there is logged and does not stop archival.
    pub async fn archive_host(&self, hostname: &str) -> ServiceResult<()> {
        let filter = AlertsFilter::for_hostname(hostname);
        match self.alerts.ack_alerts(&filter).await {
            Ok(count) => debug!("Acknowledged {} alerts of host {}", count, hostname),
            Err(e) => error!("Can't ack hostname {} alerts by filter: {}", hostname, e),
        }

        self.store.archive_host(hostname).await?;
        info!("Host {} archived", hostname);
        Ok(())
    }
}
