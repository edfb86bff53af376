use std::str::FromStr;

use rusoto_core::Region;

/// Endpoint prefixes for the services an inventory run talks to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Service {
    Ec2,
    Rds,
    Efs,
    Fsx,
    Redshift,
    DynamoDb,
}

impl Service {
    fn endpoint_prefix(self) -> &'static str {
        match self {
            Service::Ec2 => "ec2",
            Service::Rds => "rds",
            Service::Efs => "elasticfilesystem",
            Service::Fsx => "fsx",
            Service::Redshift => "redshift",
            Service::DynamoDb => "dynamodb",
        }
    }
}

/// Resolves a region name for `service`. Regions newer than rusoto's own
/// table get the standard public endpoint.
pub fn resolve(name: &str, service: Service) -> Region {
    Region::from_str(name).unwrap_or_else(|_| {
        let suffix = if name.starts_with("cn-") {
            "amazonaws.com.cn"
        } else {
            "amazonaws.com"
        };
        Region::Custom {
            name: name.to_string(),
            endpoint: format!("https://{}.{}.{}", service.endpoint_prefix(), name, suffix),
        }
    })
}

/// Region for the region-listing call: `AWS_DEFAULT_REGION`, `AWS_REGION`, or us-east-1.
pub fn default_region_name() -> String {
    Region::default().name().to_string()
}
