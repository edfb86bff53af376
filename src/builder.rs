use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use crate::category::{ExclusionSet, ResourceCategory};
use crate::cloud_api::{CloudApi, Connector};
use crate::error::ProviderError;
use crate::membership::{EfsCandidate, RdsListing, SubnetGroupIndex, UnscopedResources};
use crate::model::{
    DynamoDbTable, Ec2Instance, Inventory, NetworkComponents, RegionEntry, RegionWideResources,
    ResourceBundle, VpcEntry, VpcInfo,
};
use crate::pagination::{paginate, paginate_or_empty};

pub const DEFAULT_MAX_CONCURRENT_REGIONS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRegion {
    pub region: String,
    pub error: ProviderError,
}

/// The inventory plus whatever kept parts of it from being built.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub inventory: Inventory,
    pub discovery_error: Option<ProviderError>,
    pub skipped_regions: Vec<SkippedRegion>,
}

pub struct InventoryBuilder<C> {
    connector: C,
    exclusions: ExclusionSet,
    max_concurrent_regions: usize,
}

impl<C: Connector> InventoryBuilder<C> {
    pub fn new(connector: C, exclusions: ExclusionSet) -> Self {
        InventoryBuilder {
            connector,
            exclusions,
            max_concurrent_regions: DEFAULT_MAX_CONCURRENT_REGIONS,
        }
    }

    pub fn with_max_concurrent_regions(mut self, limit: usize) -> Self {
        self.max_concurrent_regions = limit.max(1);
        self
    }

    /// Builds the inventory for `regions`, or for every region the provider
    /// lists when `regions` is empty. Region failures are collected in the
    /// report instead of aborting the run.
    pub async fn build_inventory(&self, regions: &[String]) -> BuildReport {
        let mut report = BuildReport::default();
        let regions = if regions.is_empty() {
            match self.discover_regions().await {
                Ok(discovered) => discovered,
                Err(error) => {
                    error!(error = %error, "could not list regions, check credentials and permissions");
                    report.discovery_error = Some(error);
                    return report;
                }
            }
        } else {
            regions.to_vec()
        };

        info!(
            regions = regions.len(),
            excluded = %self.exclusions,
            "building inventory"
        );

        let results: Vec<(String, Result<RegionEntry, ProviderError>)> = stream::iter(regions)
            .map(move |region| async move {
                let result = self.build_region(&region).await;
                (region, result)
            })
            .buffer_unordered(self.max_concurrent_regions)
            .collect()
            .await;

        for (region, result) in results {
            match result {
                Ok(entry) => {
                    report.inventory.regions.insert(region, entry);
                }
                Err(error) => {
                    warn!(
                        region = %region,
                        error = %error,
                        "skipping region, it may be disabled or inaccessible"
                    );
                    report.skipped_regions.push(SkippedRegion { region, error });
                }
            }
        }
        report
            .skipped_regions
            .sort_by(|left, right| left.region.cmp(&right.region));
        report
    }

    async fn discover_regions(&self) -> Result<Vec<String>, ProviderError> {
        let api = self.connector.connect(&self.connector.default_region())?;
        api.describe_regions().await
    }

    /// Builds one region with a client bundle created for it alone.
    ///
    /// Errors only when the region cannot be reached at all: no client, or
    /// VPC discovery failing on its first page.
    pub async fn build_region(&self, region: &str) -> Result<RegionEntry, ProviderError> {
        info!(region, "processing region");
        let api = self.connector.connect(region)?;
        let api = &api;

        let vpcs = paginate("ec2:DescribeVpcs", move |token| api.describe_vpcs(token)).await?;
        let mut entry = RegionEntry::default();
        if vpcs.is_empty() {
            warn!(region, "no VPCs found or accessible");
        } else {
            let unscoped = self.fetch_unscoped(api, region).await;
            for vpc in vpcs {
                let vpc_id = vpc.vpc_id.clone();
                debug!(region, vpc_id = %vpc_id, "processing VPC");
                let vpc_entry = self.build_vpc(api, vpc, &unscoped).await;
                entry.vpcs.insert(vpc_id, vpc_entry);
            }
        }

        if self.exclusions.includes(ResourceCategory::Dynamodb) {
            entry.region_wide = Some(RegionWideResources {
                dynamodb_tables: collect_dynamodb_tables(api, region).await,
            });
        }

        info!(region, vpcs = entry.vpcs.len(), "region processed");
        Ok(entry)
    }

    /// Listings that cannot be filtered by VPC, fetched once for the region.
    async fn fetch_unscoped(&self, api: &C::Api, region: &str) -> UnscopedResources {
        let mut unscoped = UnscopedResources::default();

        if self.exclusions.includes(ResourceCategory::Rds) {
            let groups = paginate_or_empty("rds:DescribeDBSubnetGroups", move |token| {
                api.describe_db_subnet_groups(token)
            })
            .await;
            let subnet_groups = SubnetGroupIndex::new(groups);
            debug!(region, subnet_groups = subnet_groups.len(), "indexed DB subnet groups");
            unscoped.rds = Some(RdsListing {
                subnet_groups,
                instances: paginate_or_empty("rds:DescribeDBInstances", move |token| {
                    api.describe_db_instances(token)
                })
                .await,
                clusters: paginate_or_empty("rds:DescribeDBClusters", move |token| {
                    api.describe_db_clusters(token)
                })
                .await,
            });
        }

        if self.exclusions.includes(ResourceCategory::Efs) {
            unscoped.efs = Some(collect_efs_candidates(api).await);
        }

        if self.exclusions.includes(ResourceCategory::Fsx) {
            unscoped.fsx = Some(
                paginate_or_empty("fsx:DescribeFileSystems", move |token| {
                    api.describe_fsx_file_systems(token)
                })
                .await,
            );
        }

        if self.exclusions.includes(ResourceCategory::Redshift) {
            unscoped.redshift = Some(
                paginate_or_empty("redshift:DescribeClusters", move |token| {
                    api.describe_redshift_clusters(token)
                })
                .await,
            );
        }

        unscoped
    }

    async fn build_vpc(
        &self,
        api: &C::Api,
        vpc: VpcInfo,
        unscoped: &UnscopedResources,
    ) -> VpcEntry {
        let vpc_id = vpc.vpc_id.clone();
        let vpc_id = vpc_id.as_str();

        let network_components = collect_network_components(api, vpc_id).await;
        let security_groups = paginate_or_empty("ec2:DescribeSecurityGroups", move |token| {
            api.describe_security_groups(vpc_id, token)
        })
        .await;

        let ec2_instances = if self.exclusions.includes(ResourceCategory::Ec2) {
            Some(collect_instances(api, vpc_id).await)
        } else {
            None
        };

        VpcEntry {
            vpc_info: vpc,
            network_components,
            security_groups,
            resources: ResourceBundle {
                ec2_instances,
                rds_instances: unscoped.rds_for(vpc_id),
                efs_filesystems: unscoped.efs_for(vpc_id),
                fsx_filesystems: unscoped.fsx_for(vpc_id),
                redshift_clusters: unscoped.redshift_for(vpc_id),
            },
        }
    }
}

async fn collect_network_components<A: CloudApi>(api: &A, vpc_id: &str) -> NetworkComponents {
    NetworkComponents {
        subnets: paginate_or_empty("ec2:DescribeSubnets", move |token| {
            api.describe_subnets(vpc_id, token)
        })
        .await,
        route_tables: paginate_or_empty("ec2:DescribeRouteTables", move |token| {
            api.describe_route_tables(vpc_id, token)
        })
        .await,
        internet_gateways: paginate_or_empty("ec2:DescribeInternetGateways", move |token| {
            api.describe_internet_gateways(vpc_id, token)
        })
        .await,
        nat_gateways: paginate_or_empty("ec2:DescribeNatGateways", move |token| {
            api.describe_nat_gateways(vpc_id, token)
        })
        .await,
    }
}

async fn collect_instances<A: CloudApi>(api: &A, vpc_id: &str) -> Vec<Ec2Instance> {
    let mut instances = paginate_or_empty("ec2:DescribeInstances", move |token| {
        api.describe_instances(vpc_id, token)
    })
    .await;

    for instance in &mut instances {
        for volume in &mut instance.ebs_volumes {
            match api.describe_volume(&volume.volume_id).await {
                Ok(details) => volume.volume_details = details,
                Err(error) => warn!(
                    instance_id = %instance.instance_id,
                    volume_id = %volume.volume_id,
                    error = %error,
                    "could not describe volume"
                ),
            }
        }
    }
    instances
}

async fn collect_efs_candidates<A: CloudApi>(api: &A) -> Vec<EfsCandidate> {
    let file_systems = paginate_or_empty("efs:DescribeFileSystems", move |token| {
        api.describe_efs_file_systems(token)
    })
    .await;

    let mut candidates = Vec::with_capacity(file_systems.len());
    for file_system in file_systems {
        let file_system_id = file_system.file_system_id.clone();
        let id = file_system_id.as_str();
        match paginate("efs:DescribeMountTargets", move |token| {
            api.describe_mount_targets(id, token)
        })
        .await
        {
            Ok(mount_targets) => candidates.push(EfsCandidate {
                file_system,
                mount_targets,
            }),
            Err(error) => warn!(
                file_system_id = %file_system_id,
                error = %error,
                "could not describe mount targets"
            ),
        }
    }
    candidates
}

async fn collect_dynamodb_tables<A: CloudApi>(api: &A, region: &str) -> Vec<DynamoDbTable> {
    let names = paginate_or_empty("dynamodb:ListTables", move |token| {
        api.list_dynamodb_tables(token)
    })
    .await;

    let mut tables = Vec::with_capacity(names.len());
    for name in names {
        match api.describe_dynamodb_table(&name).await {
            Ok(table) => tables.push(table),
            Err(error) => error!(
                region,
                table_name = %name,
                error = %error,
                "could not describe DynamoDB table"
            ),
        }
    }
    tables
}
