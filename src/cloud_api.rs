use async_trait::async_trait;

use crate::error::ProviderError;
use crate::model::{
    DynamoDbTable, Ec2Instance, EfsFileSystem, FsxFileSystem, InternetGateway, NatGateway,
    RdsCluster, RdsInstance, RedshiftCluster, RouteTable, SecurityGroup, Subnet, VolumeDetails,
    VpcInfo,
};
use crate::pagination::Page;

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug, Clone, PartialEq)]
pub struct DbSubnetGroup {
    pub name: String,
    pub vpc_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MountTarget {
    pub mount_target_id: String,
    pub subnet_id: Option<String>,
    pub vpc_id: Option<String>,
}

/// The provider calls an inventory run depends on, bound to one region.
///
/// Listing calls return a single page; callers drain them with
/// [`crate::pagination::paginate`].
#[async_trait]
pub trait CloudApi: Send + Sync {
    async fn describe_regions(&self) -> ProviderResult<Vec<String>>;

    async fn describe_vpcs(&self, next_token: Option<String>) -> ProviderResult<Page<VpcInfo>>;

    async fn describe_subnets(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<Subnet>>;

    async fn describe_route_tables(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<RouteTable>>;

    async fn describe_internet_gateways(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<InternetGateway>>;

    async fn describe_nat_gateways(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<NatGateway>>;

    async fn describe_security_groups(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<SecurityGroup>>;

    /// Instances come back with their EBS mappings but without volume details.
    async fn describe_instances(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<Ec2Instance>>;

    async fn describe_volume(&self, volume_id: &str) -> ProviderResult<Option<VolumeDetails>>;

    async fn describe_db_subnet_groups(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<DbSubnetGroup>>;

    async fn describe_db_instances(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<RdsInstance>>;

    async fn describe_db_clusters(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<RdsCluster>>;

    async fn describe_efs_file_systems(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<EfsFileSystem>>;

    async fn describe_mount_targets(
        &self,
        file_system_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<MountTarget>>;

    async fn describe_fsx_file_systems(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<FsxFileSystem>>;

    async fn describe_redshift_clusters(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<RedshiftCluster>>;

    async fn list_dynamodb_tables(&self, next_token: Option<String>) -> ProviderResult<Page<String>>;

    async fn describe_dynamodb_table(&self, table_name: &str) -> ProviderResult<DynamoDbTable>;
}

/// Builds the per-region client bundle handed to every lookup in that region.
pub trait Connector: Send + Sync {
    type Api: CloudApi;

    fn connect(&self, region: &str) -> ProviderResult<Self::Api>;

    /// Region used for the region-listing call when none are given.
    fn default_region(&self) -> String;
}
