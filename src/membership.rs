//! VPC membership for resources whose listings cannot be filtered by VPC.
//!
//! Each listing is fetched once per region and then matched against every
//! VPC in that region. A `None` listing means the category was excluded.

use std::collections::HashMap;

use crate::cloud_api::{DbSubnetGroup, MountTarget};
use crate::model::{
    EfsFileSystem, FsxFileSystem, RdsCluster, RdsInstance, RdsResources, RedshiftCluster,
    RedshiftResources,
};

/// DB subnet group name to VPC id, the only link from RDS records to a VPC.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubnetGroupIndex {
    vpc_by_group: HashMap<String, String>,
}

impl SubnetGroupIndex {
    pub fn new(groups: Vec<DbSubnetGroup>) -> Self {
        SubnetGroupIndex {
            vpc_by_group: groups
                .into_iter()
                .map(|group| (group.name, group.vpc_id))
                .collect(),
        }
    }

    pub fn vpc_of(&self, subnet_group: Option<&str>) -> Option<&str> {
        subnet_group
            .and_then(|name| self.vpc_by_group.get(name))
            .map(String::as_str)
    }

    pub fn belongs_to(&self, subnet_group: Option<&str>, vpc_id: &str) -> bool {
        self.vpc_of(subnet_group) == Some(vpc_id)
    }

    pub fn len(&self) -> usize {
        self.vpc_by_group.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RdsListing {
    pub subnet_groups: SubnetGroupIndex,
    pub instances: Vec<RdsInstance>,
    pub clusters: Vec<RdsCluster>,
}

impl RdsListing {
    pub fn for_vpc(&self, vpc_id: &str) -> RdsResources {
        RdsResources {
            db_instances: self
                .instances
                .iter()
                .filter(|db| self.subnet_groups.belongs_to(db.db_subnet_group.as_deref(), vpc_id))
                .cloned()
                .collect(),
            clusters: self
                .clusters
                .iter()
                .filter(|cluster| {
                    self.subnet_groups
                        .belongs_to(cluster.db_subnet_group.as_deref(), vpc_id)
                })
                .cloned()
                .collect(),
        }
    }
}

/// An EFS file system together with the mount targets that place it in VPCs.
#[derive(Debug, Clone, PartialEq)]
pub struct EfsCandidate {
    pub file_system: EfsFileSystem,
    pub mount_targets: Vec<MountTarget>,
}

impl EfsCandidate {
    /// The first mount target in `vpc_id` settles membership.
    pub fn belongs_to(&self, vpc_id: &str) -> bool {
        self.mount_targets
            .iter()
            .any(|target| target.vpc_id.as_deref() == Some(vpc_id))
    }
}

/// Region-level listings shared by every VPC of the region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnscopedResources {
    pub rds: Option<RdsListing>,
    pub efs: Option<Vec<EfsCandidate>>,
    pub fsx: Option<Vec<FsxFileSystem>>,
    pub redshift: Option<Vec<RedshiftCluster>>,
}

impl UnscopedResources {
    pub fn rds_for(&self, vpc_id: &str) -> Option<RdsResources> {
        self.rds.as_ref().map(|listing| listing.for_vpc(vpc_id))
    }

    pub fn efs_for(&self, vpc_id: &str) -> Option<Vec<EfsFileSystem>> {
        self.efs.as_ref().map(|candidates| {
            candidates
                .iter()
                .filter(|candidate| candidate.belongs_to(vpc_id))
                .map(|candidate| candidate.file_system.clone())
                .collect()
        })
    }

    pub fn fsx_for(&self, vpc_id: &str) -> Option<Vec<FsxFileSystem>> {
        self.fsx.as_ref().map(|file_systems| {
            file_systems
                .iter()
                .filter(|fs| fs.vpc_id.as_deref() == Some(vpc_id))
                .cloned()
                .collect()
        })
    }

    pub fn redshift_for(&self, vpc_id: &str) -> Option<RedshiftResources> {
        self.redshift.as_ref().map(|clusters| RedshiftResources {
            clusters: clusters
                .iter()
                .filter(|cluster| cluster.vpc_id.as_deref() == Some(vpc_id))
                .cloned()
                .collect(),
        })
    }
}
