use async_trait::async_trait;
use rusoto_core::credential::{DefaultCredentialsProvider, ProvideAwsCredentials};
use rusoto_core::Client;
use rusoto_dynamodb::DynamoDbClient;
use rusoto_ec2::Ec2Client;
use rusoto_efs::EfsClient;
use rusoto_fsx::FsxClient;
use rusoto_rds::RdsClient;
use rusoto_redshift::RedshiftClient;
use tracing::debug;

use crate::cloud_api::{CloudApi, Connector, DbSubnetGroup, MountTarget, ProviderResult};
use crate::dynamodb_client::DynamoDbInventoryClient;
use crate::ec2_client::Ec2InventoryClient;
use crate::efs_client::EfsInventoryClient;
use crate::error::InventoryError;
use crate::fsx_client::FsxInventoryClient;
use crate::model::{
    DynamoDbTable, Ec2Instance, EfsFileSystem, FsxFileSystem, InternetGateway, NatGateway,
    RdsCluster, RdsInstance, RedshiftCluster, RouteTable, SecurityGroup, Subnet, VolumeDetails,
    VpcInfo,
};
use crate::pagination::Page;
use crate::rds_client::RdsInventoryClient;
use crate::redshift_client::RedshiftInventoryClient;
use crate::region::{self, Service};

/// Fails unless the default credential chain yields credentials.
pub async fn verify_credentials() -> Result<(), InventoryError> {
    let provider = DefaultCredentialsProvider::new()
        .map_err(|error| InventoryError::Credentials(error.to_string()))?;
    provider
        .credentials()
        .await
        .map_err(|error| InventoryError::Credentials(error.to_string()))?;
    debug!("AWS credentials resolved");
    Ok(())
}

/// Connects to AWS with the shared rusoto client and default credential chain.
pub struct AwsConnector {
    client: Client,
}

impl AwsConnector {
    pub fn new() -> Self {
        AwsConnector {
            client: Client::shared(),
        }
    }
}

impl Connector for AwsConnector {
    type Api = RegionalClients;

    fn connect(&self, region: &str) -> ProviderResult<RegionalClients> {
        Ok(RegionalClients::new(self.client.clone(), region))
    }

    fn default_region(&self) -> String {
        region::default_region_name()
    }
}

/// Every service client for a single region.
pub struct RegionalClients {
    ec2: Ec2InventoryClient,
    rds: RdsInventoryClient,
    efs: EfsInventoryClient,
    fsx: FsxInventoryClient,
    redshift: RedshiftInventoryClient,
    dynamodb: DynamoDbInventoryClient,
}

impl RegionalClients {
    pub fn new(client: Client, name: &str) -> Self {
        RegionalClients {
            ec2: Ec2InventoryClient::new_with_client(Ec2Client::new_with_client(
                client.clone(),
                region::resolve(name, Service::Ec2),
            )),
            rds: RdsInventoryClient::new_with_client(RdsClient::new_with_client(
                client.clone(),
                region::resolve(name, Service::Rds),
            )),
            efs: EfsInventoryClient::new_with_client(EfsClient::new_with_client(
                client.clone(),
                region::resolve(name, Service::Efs),
            )),
            fsx: FsxInventoryClient::new_with_client(FsxClient::new_with_client(
                client.clone(),
                region::resolve(name, Service::Fsx),
            )),
            redshift: RedshiftInventoryClient::new_with_client(RedshiftClient::new_with_client(
                client.clone(),
                region::resolve(name, Service::Redshift),
            )),
            dynamodb: DynamoDbInventoryClient::new_with_client(DynamoDbClient::new_with_client(
                client,
                region::resolve(name, Service::DynamoDb),
            )),
        }
    }
}

#[async_trait]
impl CloudApi for RegionalClients {
    async fn describe_regions(&self) -> ProviderResult<Vec<String>> {
        self.ec2.describe_regions().await
    }

    async fn describe_vpcs(&self, next_token: Option<String>) -> ProviderResult<Page<VpcInfo>> {
        self.ec2.describe_vpcs(next_token).await
    }

    async fn describe_subnets(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<Subnet>> {
        self.ec2.describe_subnets(vpc_id, next_token).await
    }

    async fn describe_route_tables(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<RouteTable>> {
        self.ec2.describe_route_tables(vpc_id, next_token).await
    }

    async fn describe_internet_gateways(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<InternetGateway>> {
        self.ec2.describe_internet_gateways(vpc_id, next_token).await
    }

    async fn describe_nat_gateways(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<NatGateway>> {
        self.ec2.describe_nat_gateways(vpc_id, next_token).await
    }

    async fn describe_security_groups(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<SecurityGroup>> {
        self.ec2.describe_security_groups(vpc_id, next_token).await
    }

    async fn describe_instances(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<Ec2Instance>> {
        self.ec2.describe_instances(vpc_id, next_token).await
    }

    async fn describe_volume(&self, volume_id: &str) -> ProviderResult<Option<VolumeDetails>> {
        self.ec2.describe_volume(volume_id).await
    }

    async fn describe_db_subnet_groups(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<DbSubnetGroup>> {
        self.rds.describe_db_subnet_groups(next_token).await
    }

    async fn describe_db_instances(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<RdsInstance>> {
        self.rds.describe_db_instances(next_token).await
    }

    async fn describe_db_clusters(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<RdsCluster>> {
        self.rds.describe_db_clusters(next_token).await
    }

    async fn describe_efs_file_systems(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<EfsFileSystem>> {
        self.efs.describe_file_systems(next_token).await
    }

    async fn describe_mount_targets(
        &self,
        file_system_id: &str,
        next_token: Option<String>,
    ) -> ProviderResult<Page<MountTarget>> {
        self.efs.describe_mount_targets(file_system_id, next_token).await
    }

    async fn describe_fsx_file_systems(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<FsxFileSystem>> {
        self.fsx.describe_file_systems(next_token).await
    }

    async fn describe_redshift_clusters(
        &self,
        next_token: Option<String>,
    ) -> ProviderResult<Page<RedshiftCluster>> {
        self.redshift.describe_clusters(next_token).await
    }

    async fn list_dynamodb_tables(&self, next_token: Option<String>) -> ProviderResult<Page<String>> {
        self.dynamodb.list_tables(next_token).await
    }

    async fn describe_dynamodb_table(&self, table_name: &str) -> ProviderResult<DynamoDbTable> {
        self.dynamodb.describe_table(table_name).await
    }
}
