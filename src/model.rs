use std::collections::BTreeMap;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Key under which a region's VPC-less resources are serialized. VPC ids
/// always carry the `vpc-` prefix, so this never names a real VPC.
pub const REGION_WIDE_KEY: &str = "region_wide";

pub type Tags = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VpcInfo {
    pub vpc_id: String,
    pub cidr_block: Option<String>,
    pub state: Option<String>,
    pub is_default: bool,
    pub owner_id: Option<String>,
    pub instance_tenancy: Option<String>,
    pub dhcp_options_id: Option<String>,
    pub tags: Tags,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Subnet {
    pub subnet_id: String,
    pub availability_zone: Option<String>,
    pub cidr_block: Option<String>,
    pub available_ip_address_count: Option<i64>,
    pub map_public_ip_on_launch: bool,
    pub state: Option<String>,
    pub tags: Tags,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Route {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_cidr_block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_ipv6_cidr_block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_prefix_list_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub egress_only_internet_gateway_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nat_gateway_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transit_gateway_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_peering_connection_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_interface_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    pub origin: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteTable {
    pub route_table_id: String,
    pub main: bool,
    pub associated_subnets: Vec<String>,
    pub routes: Vec<Route>,
    pub tags: Tags,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InternetGateway {
    pub internet_gateway_id: String,
    pub attachment_state: Option<String>,
    pub tags: Tags,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NatGateway {
    pub nat_gateway_id: String,
    pub subnet_id: Option<String>,
    pub state: Option<String>,
    pub public_ips: Vec<String>,
    pub tags: Tags,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkComponents {
    pub subnets: Vec<Subnet>,
    pub route_tables: Vec<RouteTable>,
    pub internet_gateways: Vec<InternetGateway>,
    pub nat_gateways: Vec<NatGateway>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SecurityGroup {
    pub group_id: String,
    pub group_name: Option<String>,
    pub description: Option<String>,
    pub ingress_rules: Vec<SecurityGroupRule>,
    pub egress_rules: Vec<SecurityGroupRule>,
    pub tags: Tags,
}

/// One permission entry. `ip_protocol` is `-1` for all protocols, in which
/// case the port range is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SecurityGroupRule {
    pub ip_protocol: Option<String>,
    pub from_port: Option<i64>,
    pub to_port: Option<i64>,
    pub ipv4_ranges: Vec<CidrRange>,
    pub ipv6_ranges: Vec<CidrRange>,
    pub prefix_list_ids: Vec<String>,
    pub source_groups: Vec<RuleSourceGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CidrRange {
    pub cidr: String,
    pub description: Option<String>,
}

/// A security group referenced by a rule, possibly in another account.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleSourceGroup {
    pub group_id: Option<String>,
    pub group_name: Option<String>,
    pub user_id: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupRef {
    pub group_id: Option<String>,
    pub group_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VolumeDetails {
    pub size_gib: Option<i64>,
    pub volume_type: Option<String>,
    pub iops: Option<i64>,
    pub encrypted: bool,
    pub state: Option<String>,
}

/// An EBS volume reached through one of an instance's block-device mappings.
/// `volume_details` stays empty when the volume's own describe call fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EbsVolume {
    pub volume_id: String,
    pub device_name: Option<String>,
    pub delete_on_termination: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_details: Option<VolumeDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ec2Instance {
    pub instance_id: String,
    pub instance_type: Option<String>,
    pub state: Option<String>,
    pub subnet_id: Option<String>,
    pub private_ip_address: Option<String>,
    pub security_groups: Vec<GroupRef>,
    pub tags: Tags,
    pub ebs_volumes: Vec<EbsVolume>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RdsInstance {
    pub db_instance_id: String,
    pub engine: Option<String>,
    pub instance_class: Option<String>,
    pub multi_az: bool,
    pub status: Option<String>,
    pub db_subnet_group: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RdsCluster {
    pub cluster_id: String,
    pub engine: Option<String>,
    pub status: Option<String>,
    pub db_subnet_group: Option<String>,
    pub cluster_members: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RdsResources {
    pub db_instances: Vec<RdsInstance>,
    pub clusters: Vec<RdsCluster>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EfsFileSystem {
    pub file_system_id: String,
    pub name: Option<String>,
    pub life_cycle_state: Option<String>,
    pub performance_mode: Option<String>,
    pub encrypted: bool,
    pub number_of_mount_targets: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FsxFileSystem {
    pub file_system_id: String,
    pub file_system_type: Option<String>,
    pub lifecycle_state: Option<String>,
    pub storage_capacity: Option<i64>,
    pub subnet_ids: Vec<String>,
    pub vpc_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RedshiftCluster {
    pub cluster_identifier: String,
    pub node_type: Option<String>,
    pub number_of_nodes: Option<i64>,
    pub cluster_status: Option<String>,
    pub vpc_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RedshiftResources {
    pub clusters: Vec<RedshiftCluster>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DynamoDbTable {
    pub table_name: String,
    pub table_status: Option<String>,
    pub item_count: i64,
    pub billing_mode: String,
}

/// Per-VPC resources. `None` means the category was excluded from the run;
/// `Some` with no entries means it was scanned and nothing was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceBundle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ec2_instances: Option<Vec<Ec2Instance>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rds_instances: Option<RdsResources>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efs_filesystems: Option<Vec<EfsFileSystem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fsx_filesystems: Option<Vec<FsxFileSystem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redshift_clusters: Option<RedshiftResources>,
}

impl ResourceBundle {
    pub fn resource_count(&self) -> usize {
        let ec2 = self.ec2_instances.as_ref().map_or(0, |instances| {
            instances
                .iter()
                .map(|instance| 1 + instance.ebs_volumes.len())
                .sum()
        });
        let rds = self
            .rds_instances
            .as_ref()
            .map_or(0, |rds| rds.db_instances.len() + rds.clusters.len());
        let efs = self.efs_filesystems.as_ref().map_or(0, Vec::len);
        let fsx = self.fsx_filesystems.as_ref().map_or(0, Vec::len);
        let redshift = self
            .redshift_clusters
            .as_ref()
            .map_or(0, |redshift| redshift.clusters.len());
        ec2 + rds + efs + fsx + redshift
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VpcEntry {
    pub vpc_info: VpcInfo,
    pub network_components: NetworkComponents,
    pub security_groups: Vec<SecurityGroup>,
    pub resources: ResourceBundle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegionWideResources {
    pub dynamodb_tables: Vec<DynamoDbTable>,
}

/// One region: its VPCs keyed by id, and the region-wide bucket unless
/// DynamoDB was excluded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionEntry {
    pub vpcs: BTreeMap<String, VpcEntry>,
    pub region_wide: Option<RegionWideResources>,
}

impl RegionEntry {
    pub fn is_empty(&self) -> bool {
        self.vpcs.is_empty()
            && self
                .region_wide
                .as_ref()
                .map_or(true, |bucket| bucket.dynamodb_tables.is_empty())
    }
}

impl Serialize for RegionEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.vpcs.len() + usize::from(self.region_wide.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (vpc_id, entry) in &self.vpcs {
            map.serialize_entry(vpc_id, entry)?;
        }
        if let Some(region_wide) = &self.region_wide {
            map.serialize_entry(REGION_WIDE_KEY, region_wide)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Inventory {
    pub regions: BTreeMap<String, RegionEntry>,
}

impl Inventory {
    /// True when no region produced a VPC or a region-wide resource.
    pub fn is_empty(&self) -> bool {
        self.regions.values().all(RegionEntry::is_empty)
    }

    pub fn vpc_count(&self) -> usize {
        self.regions.values().map(|region| region.vpcs.len()).sum()
    }

    pub fn resource_count(&self) -> usize {
        self.regions
            .values()
            .map(|region| {
                let in_vpcs: usize = region
                    .vpcs
                    .values()
                    .map(|vpc| vpc.resources.resource_count())
                    .sum();
                let region_wide = region
                    .region_wide
                    .as_ref()
                    .map_or(0, |bucket| bucket.dynamodb_tables.len());
                in_vpcs + region_wide
            })
            .sum()
    }
}
