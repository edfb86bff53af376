use std::collections::BTreeMap;

use rusoto_ec2::{
    DescribeInstancesRequest, DescribeInternetGatewaysRequest, DescribeNatGatewaysRequest,
    DescribeRegionsRequest, DescribeRouteTablesRequest, DescribeSecurityGroupsRequest,
    DescribeSubnetsRequest, DescribeVolumesRequest, DescribeVpcsRequest, Ec2, Ec2Client, Filter,
    Tag,
};

use crate::error::ProviderError;
use crate::model::{
    CidrRange, EbsVolume, Ec2Instance, GroupRef, InternetGateway, NatGateway, Route, RouteTable,
    RuleSourceGroup, SecurityGroup, SecurityGroupRule, Subnet, Tags, VolumeDetails, VpcInfo,
};
use crate::pagination::Page;

const PAGE_SIZE: i64 = 100;

pub struct Ec2InventoryClient {
    client: Ec2Client,
}

fn filter(name: &str, value: &str) -> Option<Vec<Filter>> {
    Some(vec![Filter {
        name: Some(name.to_string()),
        values: Some(vec![value.to_string()]),
    }])
}

fn tag_map(tags: Option<Vec<Tag>>) -> Tags {
    tags.unwrap_or_default()
        .into_iter()
        .filter_map(|tag| Some((tag.key?, tag.value.unwrap_or_default())))
        .collect::<BTreeMap<_, _>>()
}

impl From<rusoto_ec2::Vpc> for VpcInfo {
    fn from(vpc: rusoto_ec2::Vpc) -> Self {
        VpcInfo {
            vpc_id: vpc.vpc_id.unwrap_or_default(),
            cidr_block: vpc.cidr_block,
            state: vpc.state,
            is_default: vpc.is_default.unwrap_or(false),
            owner_id: vpc.owner_id,
            instance_tenancy: vpc.instance_tenancy,
            dhcp_options_id: vpc.dhcp_options_id,
            tags: tag_map(vpc.tags),
        }
    }
}

impl From<rusoto_ec2::Subnet> for Subnet {
    fn from(subnet: rusoto_ec2::Subnet) -> Self {
        Subnet {
            subnet_id: subnet.subnet_id.unwrap_or_default(),
            availability_zone: subnet.availability_zone,
            cidr_block: subnet.cidr_block,
            available_ip_address_count: subnet.available_ip_address_count,
            map_public_ip_on_launch: subnet.map_public_ip_on_launch.unwrap_or(false),
            state: subnet.state,
            tags: tag_map(subnet.tags),
        }
    }
}

impl From<rusoto_ec2::Route> for Route {
    fn from(route: rusoto_ec2::Route) -> Self {
        Route {
            destination_cidr_block: route.destination_cidr_block,
            destination_ipv6_cidr_block: route.destination_ipv_6_cidr_block,
            destination_prefix_list_id: route.destination_prefix_list_id,
            gateway_id: route.gateway_id,
            egress_only_internet_gateway_id: route.egress_only_internet_gateway_id,
            nat_gateway_id: route.nat_gateway_id,
            transit_gateway_id: route.transit_gateway_id,
            vpc_peering_connection_id: route.vpc_peering_connection_id,
            network_interface_id: route.network_interface_id,
            instance_id: route.instance_id,
            origin: route.origin,
            state: route.state,
        }
    }
}

impl From<rusoto_ec2::RouteTable> for RouteTable {
    fn from(table: rusoto_ec2::RouteTable) -> Self {
        let associations = table.associations.unwrap_or_default();
        RouteTable {
            route_table_id: table.route_table_id.unwrap_or_default(),
            main: associations
                .iter()
                .any(|association| association.main.unwrap_or(false)),
            associated_subnets: associations
                .into_iter()
                .filter_map(|association| association.subnet_id)
                .collect(),
            routes: table
                .routes
                .unwrap_or_default()
                .into_iter()
                .map(Route::from)
                .collect(),
            tags: tag_map(table.tags),
        }
    }
}

impl From<rusoto_ec2::InternetGateway> for InternetGateway {
    fn from(gateway: rusoto_ec2::InternetGateway) -> Self {
        InternetGateway {
            internet_gateway_id: gateway.internet_gateway_id.unwrap_or_default(),
            attachment_state: gateway
                .attachments
                .unwrap_or_default()
                .into_iter()
                .find_map(|attachment| attachment.state),
            tags: tag_map(gateway.tags),
        }
    }
}

impl From<rusoto_ec2::NatGateway> for NatGateway {
    fn from(gateway: rusoto_ec2::NatGateway) -> Self {
        NatGateway {
            nat_gateway_id: gateway.nat_gateway_id.unwrap_or_default(),
            subnet_id: gateway.subnet_id,
            state: gateway.state,
            public_ips: gateway
                .nat_gateway_addresses
                .unwrap_or_default()
                .into_iter()
                .filter_map(|address| address.public_ip)
                .collect(),
            tags: tag_map(gateway.tags),
        }
    }
}

impl From<rusoto_ec2::IpPermission> for SecurityGroupRule {
    fn from(permission: rusoto_ec2::IpPermission) -> Self {
        SecurityGroupRule {
            ip_protocol: permission.ip_protocol,
            from_port: permission.from_port,
            to_port: permission.to_port,
            ipv4_ranges: permission
                .ip_ranges
                .unwrap_or_default()
                .into_iter()
                .filter_map(|range| {
                    Some(CidrRange {
                        cidr: range.cidr_ip?,
                        description: range.description,
                    })
                })
                .collect(),
            ipv6_ranges: permission
                .ipv_6_ranges
                .unwrap_or_default()
                .into_iter()
                .filter_map(|range| {
                    Some(CidrRange {
                        cidr: range.cidr_ipv_6?,
                        description: range.description,
                    })
                })
                .collect(),
            prefix_list_ids: permission
                .prefix_list_ids
                .unwrap_or_default()
                .into_iter()
                .filter_map(|prefix_list| prefix_list.prefix_list_id)
                .collect(),
            source_groups: permission
                .user_id_group_pairs
                .unwrap_or_default()
                .into_iter()
                .map(|pair| RuleSourceGroup {
                    group_id: pair.group_id,
                    group_name: pair.group_name,
                    user_id: pair.user_id,
                    description: pair.description,
                })
                .collect(),
        }
    }
}

fn rules(permissions: Option<Vec<rusoto_ec2::IpPermission>>) -> Vec<SecurityGroupRule> {
    permissions
        .unwrap_or_default()
        .into_iter()
        .map(SecurityGroupRule::from)
        .collect()
}

impl From<rusoto_ec2::SecurityGroup> for SecurityGroup {
    fn from(group: rusoto_ec2::SecurityGroup) -> Self {
        SecurityGroup {
            group_id: group.group_id.unwrap_or_default(),
            group_name: group.group_name,
            description: group.description,
            ingress_rules: rules(group.ip_permissions),
            egress_rules: rules(group.ip_permissions_egress),
            tags: tag_map(group.tags),
        }
    }
}

impl From<rusoto_ec2::Instance> for Ec2Instance {
    fn from(instance: rusoto_ec2::Instance) -> Self {
        let ebs_volumes = instance
            .block_device_mappings
            .unwrap_or_default()
            .into_iter()
            .filter_map(|mapping| {
                let ebs = mapping.ebs?;
                Some(EbsVolume {
                    volume_id: ebs.volume_id?,
                    device_name: mapping.device_name,
                    delete_on_termination: ebs.delete_on_termination.unwrap_or(false),
                    volume_details: None,
                })
            })
            .collect();
        Ec2Instance {
            instance_id: instance.instance_id.unwrap_or_default(),
            instance_type: instance.instance_type,
            state: instance.state.and_then(|state| state.name),
            subnet_id: instance.subnet_id,
            private_ip_address: instance.private_ip_address,
            security_groups: instance
                .security_groups
                .unwrap_or_default()
                .into_iter()
                .map(|group| GroupRef {
                    group_id: group.group_id,
                    group_name: group.group_name,
                })
                .collect(),
            tags: tag_map(instance.tags),
            ebs_volumes,
        }
    }
}

impl From<rusoto_ec2::Volume> for VolumeDetails {
    fn from(volume: rusoto_ec2::Volume) -> Self {
        VolumeDetails {
            size_gib: volume.size,
            volume_type: volume.volume_type,
            iops: volume.iops,
            encrypted: volume.encrypted.unwrap_or(false),
            state: volume.state,
        }
    }
}

impl Ec2InventoryClient {
    pub fn new_with_client(client: Ec2Client) -> Self {
        Ec2InventoryClient { client }
    }

    /// Names of the regions enabled for the account, sorted.
    pub async fn describe_regions(&self) -> Result<Vec<String>, ProviderError> {
        let result = self
            .client
            .describe_regions(DescribeRegionsRequest::default())
            .await?;
        let mut regions: Vec<String> = result
            .regions
            .unwrap_or_default()
            .into_iter()
            .filter_map(|region| region.region_name)
            .collect();
        regions.sort();
        Ok(regions)
    }

    pub async fn describe_vpcs(&self, next_token: Option<String>) -> Result<Page<VpcInfo>, ProviderError> {
        let result = self
            .client
            .describe_vpcs(DescribeVpcsRequest {
                max_results: Some(PAGE_SIZE),
                next_token,
                ..DescribeVpcsRequest::default()
            })
            .await?;
        let vpcs = result
            .vpcs
            .unwrap_or_default()
            .into_iter()
            .map(VpcInfo::from)
            .filter(|vpc| !vpc.vpc_id.is_empty())
            .collect();
        Ok(Page::new(vpcs, result.next_token))
    }

    pub async fn describe_subnets(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<Subnet>, ProviderError> {
        let result = self
            .client
            .describe_subnets(DescribeSubnetsRequest {
                filters: filter("vpc-id", vpc_id),
                max_results: Some(PAGE_SIZE),
                next_token,
                ..DescribeSubnetsRequest::default()
            })
            .await?;
        let subnets = result
            .subnets
            .unwrap_or_default()
            .into_iter()
            .map(Subnet::from)
            .collect();
        Ok(Page::new(subnets, result.next_token))
    }

    pub async fn describe_route_tables(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<RouteTable>, ProviderError> {
        let result = self
            .client
            .describe_route_tables(DescribeRouteTablesRequest {
                filters: filter("vpc-id", vpc_id),
                max_results: Some(PAGE_SIZE),
                next_token,
                ..DescribeRouteTablesRequest::default()
            })
            .await?;
        let tables = result
            .route_tables
            .unwrap_or_default()
            .into_iter()
            .map(RouteTable::from)
            .collect();
        Ok(Page::new(tables, result.next_token))
    }

    pub async fn describe_internet_gateways(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<InternetGateway>, ProviderError> {
        let result = self
            .client
            .describe_internet_gateways(DescribeInternetGatewaysRequest {
                filters: filter("attachment.vpc-id", vpc_id),
                max_results: Some(PAGE_SIZE),
                next_token,
                ..DescribeInternetGatewaysRequest::default()
            })
            .await?;
        let gateways = result
            .internet_gateways
            .unwrap_or_default()
            .into_iter()
            .map(InternetGateway::from)
            .collect();
        Ok(Page::new(gateways, result.next_token))
    }

    pub async fn describe_nat_gateways(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<NatGateway>, ProviderError> {
        let result = self
            .client
            .describe_nat_gateways(DescribeNatGatewaysRequest {
                filter: filter("vpc-id", vpc_id),
                max_results: Some(PAGE_SIZE),
                next_token,
                ..DescribeNatGatewaysRequest::default()
            })
            .await?;
        let gateways = result
            .nat_gateways
            .unwrap_or_default()
            .into_iter()
            .map(NatGateway::from)
            .collect();
        Ok(Page::new(gateways, result.next_token))
    }

    pub async fn describe_security_groups(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<SecurityGroup>, ProviderError> {
        let result = self
            .client
            .describe_security_groups(DescribeSecurityGroupsRequest {
                filters: filter("vpc-id", vpc_id),
                max_results: Some(PAGE_SIZE),
                next_token,
                ..DescribeSecurityGroupsRequest::default()
            })
            .await?;
        let groups = result
            .security_groups
            .unwrap_or_default()
            .into_iter()
            .map(SecurityGroup::from)
            .collect();
        Ok(Page::new(groups, result.next_token))
    }

    pub async fn describe_instances(
        &self,
        vpc_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<Ec2Instance>, ProviderError> {
        let result = self
            .client
            .describe_instances(DescribeInstancesRequest {
                filters: filter("vpc-id", vpc_id),
                max_results: Some(PAGE_SIZE),
                next_token,
                ..DescribeInstancesRequest::default()
            })
            .await?;

        let mut instances = Vec::new();
        for reservation in result.reservations.unwrap_or_default() {
            for instance in reservation.instances.unwrap_or_default() {
                instances.push(Ec2Instance::from(instance));
            }
        }
        Ok(Page::new(instances, result.next_token))
    }

    pub async fn describe_volume(&self, volume_id: &str) -> Result<Option<VolumeDetails>, ProviderError> {
        let result = self
            .client
            .describe_volumes(DescribeVolumesRequest {
                volume_ids: Some(vec![volume_id.to_string()]),
                ..DescribeVolumesRequest::default()
            })
            .await?;
        Ok(result
            .volumes
            .and_then(|volumes| volumes.into_iter().next())
            .map(VolumeDetails::from))
    }
}
