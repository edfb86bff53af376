use rusoto_fsx::{DescribeFileSystemsRequest, FileSystem, Fsx, FsxClient};

use crate::error::ProviderError;
use crate::model::FsxFileSystem;
use crate::pagination::Page;

pub struct FsxInventoryClient {
    client: FsxClient,
}

impl From<FileSystem> for FsxFileSystem {
    fn from(fs: FileSystem) -> Self {
        FsxFileSystem {
            file_system_id: fs.file_system_id.unwrap_or_default(),
            file_system_type: fs.file_system_type,
            lifecycle_state: fs.lifecycle,
            storage_capacity: fs.storage_capacity,
            subnet_ids: fs.subnet_ids.unwrap_or_default(),
            vpc_id: fs.vpc_id,
        }
    }
}

impl FsxInventoryClient {
    pub fn new_with_client(client: FsxClient) -> Self {
        FsxInventoryClient { client }
    }

    pub async fn describe_file_systems(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<FsxFileSystem>, ProviderError> {
        let result = self
            .client
            .describe_file_systems(DescribeFileSystemsRequest {
                next_token,
                ..DescribeFileSystemsRequest::default()
            })
            .await?;
        let file_systems = result
            .file_systems
            .unwrap_or_default()
            .into_iter()
            .map(FsxFileSystem::from)
            .collect();
        Ok(Page::new(file_systems, result.next_token))
    }
}
