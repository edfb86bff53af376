use rusoto_rds::{
    DescribeDBClustersMessage, DescribeDBInstancesMessage, DescribeDBSubnetGroupsMessage, Rds,
    RdsClient,
};

use crate::cloud_api::DbSubnetGroup;
use crate::error::ProviderError;
use crate::model::{RdsCluster, RdsInstance};
use crate::pagination::Page;

const PAGE_SIZE: i64 = 100;

pub struct RdsInventoryClient {
    client: RdsClient,
}

impl From<rusoto_rds::DBInstance> for RdsInstance {
    fn from(db: rusoto_rds::DBInstance) -> Self {
        RdsInstance {
            db_instance_id: db.db_instance_identifier.unwrap_or_default(),
            engine: db.engine,
            instance_class: db.db_instance_class,
            multi_az: db.multi_az.unwrap_or(false),
            status: db.db_instance_status,
            db_subnet_group: db.db_subnet_group.and_then(|group| group.db_subnet_group_name),
        }
    }
}

impl From<rusoto_rds::DBCluster> for RdsCluster {
    fn from(cluster: rusoto_rds::DBCluster) -> Self {
        RdsCluster {
            cluster_id: cluster.db_cluster_identifier.unwrap_or_default(),
            engine: cluster.engine,
            status: cluster.status,
            db_subnet_group: cluster.db_subnet_group,
            cluster_members: cluster
                .db_cluster_members
                .unwrap_or_default()
                .into_iter()
                .filter_map(|member| member.db_instance_identifier)
                .collect(),
        }
    }
}

impl RdsInventoryClient {
    pub fn new_with_client(client: RdsClient) -> Self {
        RdsInventoryClient { client }
    }

    /// Subnet groups that name both themselves and their VPC.
    pub async fn describe_db_subnet_groups(
        &self,
        marker: Option<String>,
    ) -> Result<Page<DbSubnetGroup>, ProviderError> {
        let result = self
            .client
            .describe_db_subnet_groups(DescribeDBSubnetGroupsMessage {
                marker,
                max_records: Some(PAGE_SIZE),
                ..DescribeDBSubnetGroupsMessage::default()
            })
            .await?;
        let groups = result
            .db_subnet_groups
            .unwrap_or_default()
            .into_iter()
            .filter_map(|group| {
                Some(DbSubnetGroup {
                    name: group.db_subnet_group_name?,
                    vpc_id: group.vpc_id?,
                })
            })
            .collect();
        Ok(Page::new(groups, result.marker))
    }

    pub async fn describe_db_instances(
        &self,
        marker: Option<String>,
    ) -> Result<Page<RdsInstance>, ProviderError> {
        let result = self
            .client
            .describe_db_instances(DescribeDBInstancesMessage {
                marker,
                max_records: Some(PAGE_SIZE),
                ..DescribeDBInstancesMessage::default()
            })
            .await?;
        let instances = result
            .db_instances
            .unwrap_or_default()
            .into_iter()
            .map(RdsInstance::from)
            .collect();
        Ok(Page::new(instances, result.marker))
    }

    pub async fn describe_db_clusters(
        &self,
        marker: Option<String>,
    ) -> Result<Page<RdsCluster>, ProviderError> {
        let result = self
            .client
            .describe_db_clusters(DescribeDBClustersMessage {
                marker,
                max_records: Some(PAGE_SIZE),
                ..DescribeDBClustersMessage::default()
            })
            .await?;
        let clusters = result
            .db_clusters
            .unwrap_or_default()
            .into_iter()
            .map(RdsCluster::from)
            .collect();
        Ok(Page::new(clusters, result.marker))
    }
}

#[cfg(test)]
mod tests {
    use crate::cloud_api::DbSubnetGroup;
    use crate::model::{RdsCluster, RdsInstance};
    use crate::rds_client::RdsInventoryClient;
    use rusoto_mock::{
        MockCredentialsProvider, MockRequestDispatcher, MockResponseReader, ReadMockResponse,
    };
    use rusoto_rds::{DBCluster, DBClusterMember, DBInstance, DBSubnetGroup, RdsClient};

    #[tokio::test]
    async fn test_describe_db_subnet_groups() {
        let mock = RdsClient::new_with(
            MockRequestDispatcher::default().with_body(&*MockResponseReader::read_response(
                "test_resources/valid",
                "describe_db_subnet_groups.xml",
            )),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = RdsInventoryClient::new_with_client(mock);
        let page = client.describe_db_subnet_groups(None).await.unwrap();

        assert_eq!(
            page.items,
            vec![DbSubnetGroup {
                name: "mydbsubnetgroup".to_string(),
                vpc_id: "vpc-0f08e7610a1b2c3d4".to_string(),
            }]
        );
        assert_eq!(page.next_token, None);
    }

    #[test]
    fn test_instance_keeps_subnet_group_name() {
        let db = DBInstance {
            db_instance_identifier: Some("orders".to_string()),
            engine: Some("postgres".to_string()),
            db_instance_class: Some("db.r5.large".to_string()),
            multi_az: Some(true),
            db_subnet_group: Some(DBSubnetGroup {
                db_subnet_group_name: Some("app".to_string()),
                vpc_id: Some("vpc-ignored".to_string()),
                ..DBSubnetGroup::default()
            }),
            ..DBInstance::default()
        };

        assert_eq!(
            RdsInstance::from(db),
            RdsInstance {
                db_instance_id: "orders".to_string(),
                engine: Some("postgres".to_string()),
                instance_class: Some("db.r5.large".to_string()),
                multi_az: true,
                status: None,
                db_subnet_group: Some("app".to_string()),
            }
        );
    }

    #[test]
    fn test_cluster_members() {
        let cluster = DBCluster {
            db_cluster_identifier: Some("aurora".to_string()),
            db_subnet_group: Some("app".to_string()),
            db_cluster_members: Some(vec![
                DBClusterMember {
                    db_instance_identifier: Some("aurora-1".to_string()),
                    ..DBClusterMember::default()
                },
                DBClusterMember {
                    db_instance_identifier: Some("aurora-2".to_string()),
                    ..DBClusterMember::default()
                },
            ]),
            ..DBCluster::default()
        };

        let cluster = RdsCluster::from(cluster);
        assert_eq!(cluster.cluster_members, vec!["aurora-1", "aurora-2"]);
        assert_eq!(cluster.db_subnet_group.as_deref(), Some("app"));
    }
}
