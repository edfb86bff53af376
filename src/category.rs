use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

/// Resource categories that can be left out of an inventory run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    Ec2,
    Rds,
    Efs,
    Fsx,
    Redshift,
    Dynamodb,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 6] = [
        ResourceCategory::Ec2,
        ResourceCategory::Rds,
        ResourceCategory::Efs,
        ResourceCategory::Fsx,
        ResourceCategory::Redshift,
        ResourceCategory::Dynamodb,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceCategory::Ec2 => "ec2",
            ResourceCategory::Rds => "rds",
            ResourceCategory::Efs => "efs",
            ResourceCategory::Fsx => "fsx",
            ResourceCategory::Redshift => "redshift",
            ResourceCategory::Dynamodb => "dynamodb",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceCategory {
    type Err = InventoryError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.trim().to_ascii_lowercase();
        ResourceCategory::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| InventoryError::UnknownCategory(name.to_string()))
    }
}

/// The categories a run must neither fetch nor report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    excluded: BTreeSet<ResourceCategory>,
}

impl ExclusionSet {
    pub fn new<I: IntoIterator<Item = ResourceCategory>>(categories: I) -> Self {
        ExclusionSet {
            excluded: categories.into_iter().collect(),
        }
    }

    pub fn is_excluded(&self, category: ResourceCategory) -> bool {
        self.excluded.contains(&category)
    }

    pub fn includes(&self, category: ResourceCategory) -> bool {
        !self.is_excluded(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = ResourceCategory> + '_ {
        self.excluded.iter().copied()
    }
}

impl fmt::Display for ExclusionSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(ResourceCategory::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
