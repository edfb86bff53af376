//! In-memory `CloudApi` used by the builder tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::cloud_api::{CloudApi, Connector, DbSubnetGroup, MountTarget, ProviderResult};
use crate::error::ProviderError;
use crate::model::{
    DynamoDbTable, Ec2Instance, EfsFileSystem, FsxFileSystem, InternetGateway, NatGateway,
    NetworkComponents, RdsCluster, RdsInstance, RedshiftCluster, RouteTable, SecurityGroup,
    Subnet, VolumeDetails, VpcInfo,
};
use crate::pagination::Page;

pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone, Default)]
pub struct FixtureRegion {
    pub vpcs: Vec<VpcInfo>,
    pub network: HashMap<String, NetworkComponents>,
    pub security_groups: HashMap<String, Vec<SecurityGroup>>,
    pub instances: HashMap<String, Vec<Ec2Instance>>,
    pub volumes: HashMap<String, VolumeDetails>,
    pub subnet_groups: Vec<DbSubnetGroup>,
    pub db_instances: Vec<RdsInstance>,
    pub db_clusters: Vec<RdsCluster>,
    pub efs: Vec<EfsFileSystem>,
    pub mount_targets: HashMap<String, Vec<MountTarget>>,
    pub fsx: Vec<FsxFileSystem>,
    pub redshift: Vec<RedshiftCluster>,
    pub tables: Vec<DynamoDbTable>,
    /// Operation names, or `operation/id` for per-item calls, that fail.
    pub failing: HashSet<String>,
    /// Items per page; zero returns every listing as a single page.
    pub page_size: usize,
}

impl FixtureRegion {
    pub fn with_vpcs(ids: &[&str]) -> Self {
        FixtureRegion {
            vpcs: ids
                .iter()
                .map(|id| VpcInfo {
                    vpc_id: id.to_string(),
                    cidr_block: Some("10.0.0.0/16".to_string()),
                    state: Some("available".to_string()),
                    ..VpcInfo::default()
                })
                .collect(),
            ..FixtureRegion::default()
        }
    }

    pub fn fail(mut self, operation: &str) -> Self {
        self.failing.insert(operation.to_string());
        self
    }
}

type CallLog = Arc<Mutex<HashMap<String, usize>>>;

#[derive(Debug, Default)]
pub struct FixtureConnector {
    regions: HashMap<String, Arc<FixtureRegion>>,
    unreachable: HashSet<String>,
    region_listing: Option<ProviderResult<Vec<String>>>,
    calls: CallLog,
}

impl FixtureConnector {
    pub fn new() -> Self {
        FixtureConnector::default()
    }

    pub fn region(mut self, name: &str, region: FixtureRegion) -> Self {
        self.regions.insert(name.to_string(), Arc::new(region));
        self
    }

    pub fn unreachable(mut self, name: &str) -> Self {
        self.unreachable.insert(name.to_string());
        self
    }

    pub fn region_listing(mut self, listing: ProviderResult<Vec<String>>) -> Self {
        self.region_listing = Some(listing);
        self
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name.as_str() == operation || name.starts_with(&format!("{}/", operation)))
            .map(|(_, count)| *count)
            .sum()
    }
}

impl Connector for FixtureConnector {
    type Api = FixtureApi;

    fn connect(&self, region: &str) -> ProviderResult<FixtureApi> {
        if self.unreachable.contains(region) {
            return Err(ProviderError::RegionUnavailable(region.to_string()));
        }
        let listing = self.region_listing.clone().unwrap_or_else(|| {
            let mut names: Vec<String> = self.regions.keys().cloned().collect();
            names.sort();
            Ok(names)
        });
        Ok(FixtureApi {
            region: self.regions.get(region).cloned().unwrap_or_default(),
            region_listing: listing,
            calls: Arc::clone(&self.calls),
        })
    }

    fn default_region(&self) -> String {
        DEFAULT_REGION.to_string()
    }
}

pub struct FixtureApi {
    region: Arc<FixtureRegion>,
    region_listing: ProviderResult<Vec<String>>,
    calls: CallLog,
}

impl FixtureApi {
    fn record(&self, operation: String) -> ProviderResult<()> {
        *self.calls.lock().unwrap().entry(operation.clone()).or_insert(0) += 1;
        if self.region.failing.contains(&operation) {
            Err(ProviderError::AccessDenied(operation))
        } else {
            Ok(())
        }
    }

    fn page<T: Clone>(&self, items: &[T], next_token: Option<String>) -> Page<T> {
        let size = self.region.page_size;
        if size == 0 {
            return Page::new(items.to_vec(), None);
        }
        let start = next_token.map_or(0, |token| token.parse().unwrap_or(0));
        let end = (start + size).min(items.len());
        let next = if end < items.len() {
            Some(end.to_string())
        } else {
            None
        };
        Page::new(items[start..end].to_vec(), next)
    }

    fn scoped<T: Clone>(&self, map: &HashMap<String, Vec<T>>, vpc_id: &str) -> Vec<T> {
        map.get(vpc_id).cloned().unwrap_or_default()
    }

    fn network(&self, vpc_id: &str) -> NetworkComponents {
        self.region.network.get(vpc_id).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl CloudApi for FixtureApi {
    async fn describe_regions(&self) -> ProviderResult<Vec<String>> {
        self.record("ec2:DescribeRegions".to_string())?;
        self.region_listing.clone()
    }

    async fn describe_vpcs(&self, next_token: Option<String>) -> ProviderResult<Page<VpcInfo>> {
        self.record("ec2:DescribeVpcs".to_string())?;
        Ok(self.page(&self.region.vpcs, next_token))
    }

    async fn describe_subnets(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<Subnet>> {
        self.record("ec2:DescribeSubnets".to_string())?;
        Ok(self.page(&self.network(vpc_id).subnets, next_token))
    }

    async fn describe_route_tables(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<RouteTable>> {
        self.record("ec2:DescribeRouteTables".to_string())?;
        Ok(self.page(&self.network(vpc_id).route_tables, next_token))
    }

    async fn describe_internet_gateways(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<InternetGateway>> {
        self.record("ec2:DescribeInternetGateways".to_string())?;
        Ok(self.page(&self.network(vpc_id).internet_gateways, next_token))
    }

    async fn describe_nat_gateways(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<NatGateway>> {
        self.record("ec2:DescribeNatGateways".to_string())?;
        Ok(self.page(&self.network(vpc_id).nat_gateways, next_token))
    }

    async fn describe_security_groups(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<SecurityGroup>> {
        self.record("ec2:DescribeSecurityGroups".to_string())?;
        Ok(self.page(&self.scoped(&self.region.security_groups, vpc_id), next_token))
    }

    async fn describe_instances(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<Ec2Instance>> {
        self.record("ec2:DescribeInstances".to_string())?;
        Ok(self.page(&self.scoped(&self.region.instances, vpc_id), next_token))
    }

    async fn describe_volume(&self, volume_id: &str) -> ProviderResult<Option<VolumeDetails>> {
        self.record(format!("ec2:DescribeVolumes/{}", volume_id))?;
        Ok(self.region.volumes.get(volume_id).cloned())
    }

    async fn describe_db_subnet_groups(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<DbSubnetGroup>> {
        self.record("rds:DescribeDBSubnetGroups".to_string())?;
        Ok(self.page(&self.region.subnet_groups, next_token))
    }

    async fn describe_db_instances(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<RdsInstance>> {
        self.record("rds:DescribeDBInstances".to_string())?;
        Ok(self.page(&self.region.db_instances, next_token))
    }

    async fn describe_db_clusters(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<RdsCluster>> {
        self.record("rds:DescribeDBClusters".to_string())?;
        Ok(self.page(&self.region.db_clusters, next_token))
    }

    async fn describe_efs_file_systems(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<EfsFileSystem>> {
        self.record("efs:DescribeFileSystems".to_string())?;
        Ok(self.page(&self.region.efs, next_token))
    }

    async fn describe_mount_targets(
        &self,
        file_system_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<MountTarget>> {
        self.record(format!("efs:DescribeMountTargets/{}", file_system_id))?;
        Ok(self.page(
            &self.scoped(&self.region.mount_targets, file_system_id),
            next_token,
        ))
    }

    async fn describe_fsx_file_systems(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<FsxFileSystem>> {
        self.record("fsx:DescribeFileSystems".to_string())?;
        Ok(self.page(&self.region.fsx, next_token))
    }

    async fn describe_redshift_clusters(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<RedshiftCluster>> {
        self.record("redshift:DescribeClusters".to_string())?;
        Ok(self.page(&self.region.redshift, next_token))
    }

    async fn list_dynamodb_tables(&self, next_token: Option<String>) -> ProviderResult<Page<String>> {
        self.record("dynamodb:ListTables".to_string())?;
        let names: Vec<String> = self
            .region
            .tables
            .iter()
            .map(|table| table.table_name.clone())
            .collect();
        Ok(self.page(&names, next_token))
    }

    async fn describe_dynamodb_table(&self, table_name: &str) -> ProviderResult<DynamoDbTable> {
        self.record(format!("dynamodb:DescribeTable/{}", table_name))?;
        self.region
            .tables
            .iter()
            .find(|table| table.table_name == table_name)
            .cloned()
            .ok_or_else(|| ProviderError::Service(format!("table {} not found", table_name)))
    }
}
