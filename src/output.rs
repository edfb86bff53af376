use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::InventoryError;
use crate::model::{Inventory, RegionEntry, ResourceBundle, VpcEntry};

const EXCLUDED: &str = "excluded";

/// Human-readable rendering, written to any sink.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> io::Result<()>;
}

/// `aws_resource_hierarchy_<YYYYmmdd_HHMMSS>.json` in local time.
pub fn default_filename() -> PathBuf {
    PathBuf::from(
        Local::now()
            .format("aws_resource_hierarchy_%Y%m%d_%H%M%S.json")
            .to_string(),
    )
}

pub fn save_to_file(inventory: &Inventory, path: &Path) -> Result<(), InventoryError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, inventory)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn print_summary(inventory: &Inventory) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    inventory.render_text(&mut handle)
}

fn count_or_excluded<T>(value: Option<&T>, count: impl Fn(&T) -> usize) -> String {
    value.map_or_else(|| EXCLUDED.to_string(), |value| count(value).to_string())
}

impl Render for ResourceBundle {
    fn render_text(&self, w: &mut dyn Write) -> io::Result<()> {
        let instances = self.ec2_instances.as_ref();
        writeln!(
            w,
            "    EC2 instances: {}, EBS volumes: {}",
            count_or_excluded(instances, Vec::len),
            count_or_excluded(instances, |instances| instances
                .iter()
                .map(|instance| instance.ebs_volumes.len())
                .sum()),
        )?;
        let rds = self.rds_instances.as_ref();
        writeln!(
            w,
            "    RDS instances: {}, RDS clusters: {}",
            count_or_excluded(rds, |rds| rds.db_instances.len()),
            count_or_excluded(rds, |rds| rds.clusters.len()),
        )?;
        writeln!(
            w,
            "    EFS: {}, FSx: {}, Redshift clusters: {}",
            count_or_excluded(self.efs_filesystems.as_ref(), Vec::len),
            count_or_excluded(self.fsx_filesystems.as_ref(), Vec::len),
            count_or_excluded(self.redshift_clusters.as_ref(), |redshift| redshift
                .clusters
                .len()),
        )
    }
}

impl Render for VpcEntry {
    fn render_text(&self, w: &mut dyn Write) -> io::Result<()> {
        match self.vpc_info.tags.get("Name") {
            Some(name) => writeln!(w, "  VPC {} ({})", self.vpc_info.vpc_id, name)?,
            None => writeln!(w, "  VPC {}", self.vpc_info.vpc_id)?,
        }
        writeln!(
            w,
            "    subnets: {}, security groups: {}",
            self.network_components.subnets.len(),
            self.security_groups.len(),
        )?;
        self.resources.render_text(w)
    }
}

impl Render for RegionEntry {
    fn render_text(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "  DynamoDB tables: {}",
            count_or_excluded(self.region_wide.as_ref(), |bucket| bucket
                .dynamodb_tables
                .len()),
        )?;
        if self.vpcs.is_empty() {
            writeln!(w, "  no VPCs")?;
        }
        for vpc in self.vpcs.values() {
            vpc.render_text(w)?;
        }
        Ok(())
    }
}

impl Render for Inventory {
    fn render_text(&self, w: &mut dyn Write) -> io::Result<()> {
        for (name, region) in &self.regions {
            writeln!(w, "Region {}", name)?;
            region.render_text(w)?;
        }
        writeln!(
            w,
            "Total: {} regions, {} VPCs, {} resources",
            self.regions.len(),
            self.vpc_count(),
            self.resource_count(),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{
        DynamoDbTable, EbsVolume, Ec2Instance, Inventory, RegionEntry, RegionWideResources,
        ResourceBundle, VpcEntry, VpcInfo,
    };
    use crate::output::{default_filename, save_to_file, Render};
    use std::collections::BTreeMap;

    fn inventory() -> Inventory {
        let mut tags = BTreeMap::new();
        tags.insert("Name".to_string(), "production".to_string());
        let vpc = VpcEntry {
            vpc_info: VpcInfo {
                vpc_id: "vpc-1".to_string(),
                tags,
                ..VpcInfo::default()
            },
            resources: ResourceBundle {
                ec2_instances: Some(vec![Ec2Instance {
                    instance_id: "i-1".to_string(),
                    ebs_volumes: vec![
                        EbsVolume {
                            volume_id: "vol-1".to_string(),
                            ..EbsVolume::default()
                        },
                        EbsVolume {
                            volume_id: "vol-2".to_string(),
                            ..EbsVolume::default()
                        },
                    ],
                    ..Ec2Instance::default()
                }]),
                efs_filesystems: Some(Vec::new()),
                ..ResourceBundle::default()
            },
            ..VpcEntry::default()
        };
        let mut vpcs = BTreeMap::new();
        vpcs.insert("vpc-1".to_string(), vpc);

        let mut regions = BTreeMap::new();
        regions.insert(
            "us-east-1".to_string(),
            RegionEntry {
                vpcs,
                region_wide: Some(RegionWideResources {
                    dynamodb_tables: vec![DynamoDbTable {
                        table_name: "Forum".to_string(),
                        ..DynamoDbTable::default()
                    }],
                }),
            },
        );
        regions.insert("eu-west-1".to_string(), RegionEntry::default());
        Inventory { regions }
    }

    fn render(inventory: &Inventory) -> String {
        let mut buffer = Vec::new();
        inventory.render_text(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_summary_counts() {
        let text = render(&inventory());

        assert!(text.contains("Region us-east-1\n  DynamoDB tables: 1\n"));
        assert!(text.contains("  VPC vpc-1 (production)\n"));
        assert!(text.contains("    EC2 instances: 1, EBS volumes: 2\n"));
        assert!(text.contains("    EFS: 0, FSx: excluded, Redshift clusters: excluded\n"));
        assert!(text.contains("    RDS instances: excluded, RDS clusters: excluded\n"));
        assert!(text.ends_with("Total: 2 regions, 1 VPCs, 4 resources\n"));
    }

    #[test]
    fn test_summary_region_without_vpcs() {
        let text = render(&inventory());
        assert!(text.contains("Region eu-west-1\n  DynamoDB tables: excluded\n  no VPCs\n"));
    }

    #[test]
    fn test_default_filename() {
        let name = default_filename();
        let name = name.to_str().unwrap();

        assert!(name.starts_with("aws_resource_hierarchy_"));
        assert!(name.ends_with(".json"));
        assert_eq!(name.len(), "aws_resource_hierarchy_20240101_120000.json".len());
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.json");

        save_to_file(&inventory(), &path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written["us-east-1"]["region_wide"]["dynamodb_tables"][0]["table_name"],
            "Forum"
        );
        assert_eq!(
            written["us-east-1"]["vpc-1"]["resources"]["ec2_instances"][0]["ebs_volumes"]
                .as_array()
                .map(Vec::len),
            Some(2)
        );
        assert!(written["us-east-1"]["vpc-1"]["resources"]
            .get("fsx_filesystems")
            .is_none());
        assert_eq!(written["eu-west-1"], serde_json::json!({}));
    }

    #[test]
    fn test_save_to_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("inventory.json");

        assert!(save_to_file(&inventory(), &path).is_err());
    }
}
