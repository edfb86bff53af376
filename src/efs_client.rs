use rusoto_efs::{
    DescribeFileSystemsRequest, DescribeMountTargetsRequest, Efs, EfsClient,
    FileSystemDescription, MountTargetDescription,
};

use crate::cloud_api::MountTarget;
use crate::error::ProviderError;
use crate::model::EfsFileSystem;
use crate::pagination::Page;

const PAGE_SIZE: i64 = 100;

pub struct EfsInventoryClient {
    client: EfsClient,
}

impl From<FileSystemDescription> for EfsFileSystem {
    fn from(fs: FileSystemDescription) -> Self {
        EfsFileSystem {
            file_system_id: fs.file_system_id,
            name: fs.name,
            life_cycle_state: Some(fs.life_cycle_state),
            performance_mode: Some(fs.performance_mode),
            encrypted: fs.encrypted.unwrap_or(false),
            number_of_mount_targets: fs.number_of_mount_targets,
        }
    }
}

impl From<MountTargetDescription> for MountTarget {
    fn from(target: MountTargetDescription) -> Self {
        MountTarget {
            mount_target_id: target.mount_target_id,
            subnet_id: Some(target.subnet_id),
            vpc_id: target.vpc_id,
        }
    }
}

impl EfsInventoryClient {
    pub fn new_with_client(client: EfsClient) -> Self {
        EfsInventoryClient { client }
    }

    pub async fn describe_file_systems(
        &self,
        marker: Option<String>,
    ) -> Result<Page<EfsFileSystem>, ProviderError> {
        let result = self
            .client
            .describe_file_systems(DescribeFileSystemsRequest {
                marker,
                max_items: Some(PAGE_SIZE),
                ..DescribeFileSystemsRequest::default()
            })
            .await?;
        let file_systems = result
            .file_systems
            .unwrap_or_default()
            .into_iter()
            .map(EfsFileSystem::from)
            .collect();
        Ok(Page::new(file_systems, result.next_marker))
    }

    pub async fn describe_mount_targets(
        &self,
        file_system_id: &str,
        marker: Option<String>,
    ) -> Result<Page<MountTarget>, ProviderError> {
        let result = self
            .client
            .describe_mount_targets(DescribeMountTargetsRequest {
                file_system_id: Some(file_system_id.to_string()),
                marker,
                max_items: Some(PAGE_SIZE),
                ..DescribeMountTargetsRequest::default()
            })
            .await?;
        let targets = result
            .mount_targets
            .unwrap_or_default()
            .into_iter()
            .map(MountTarget::from)
            .collect();
        Ok(Page::new(targets, result.next_marker))
    }
}
