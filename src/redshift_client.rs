use rusoto_redshift::{Cluster, DescribeClustersMessage, Redshift, RedshiftClient};

use crate::error::ProviderError;
use crate::model::RedshiftCluster;
use crate::pagination::Page;

const PAGE_SIZE: i64 = 100;

pub struct RedshiftInventoryClient {
    client: RedshiftClient,
}

impl From<Cluster> for RedshiftCluster {
    fn from(cluster: Cluster) -> Self {
        RedshiftCluster {
            cluster_identifier: cluster.cluster_identifier.unwrap_or_default(),
            node_type: cluster.node_type,
            number_of_nodes: cluster.number_of_nodes,
            cluster_status: cluster.cluster_status,
            vpc_id: cluster.vpc_id,
        }
    }
}

impl RedshiftInventoryClient {
    pub fn new_with_client(client: RedshiftClient) -> Self {
        RedshiftInventoryClient { client }
    }

    pub async fn describe_clusters(
        &self,
        marker: Option<String>,
    ) -> Result<Page<RedshiftCluster>, ProviderError> {
        let result = self
            .client
            .describe_clusters(DescribeClustersMessage {
                marker,
                max_records: Some(PAGE_SIZE),
                ..DescribeClustersMessage::default()
            })
            .await?;
        let clusters = result
            .clusters
            .unwrap_or_default()
            .into_iter()
            .map(RedshiftCluster::from)
            .collect();
        Ok(Page::new(clusters, result.marker))
    }
}
