//! EC2 implementation of the spot market seam
//!
//! All aws-sdk-ec2 specifics live here: one-time spot request
//! submission with the ephemeral block-device layout, batched status
//! and instance describes, and the paginated spot price history feed.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ec2::{
    Client,
    types::{BlockDeviceMapping, InstanceType, RequestSpotLaunchSpecification, SpotInstanceType},
};
use aws_types::region::Region;
use chrono::Utc;
use tracing::{debug, warn};

use crate::bid::{BidSpec, CapacityRequest};
use crate::error::{Result, SpotError};
use crate::market::{InstanceDescription, RequestState, SpotMarket, SpotRequestStatus};
use crate::pricing::PriceObservation;

/// Default AWS region
pub const DEFAULT_REGION: &str = "us-west-1";

/// Create EC2 client from environment
pub async fn create_ec2_client(region: Option<String>) -> Result<Client> {
    let region_str = region.unwrap_or_else(|| DEFAULT_REGION.to_string());
    debug!("Creating EC2 client for region: {}", region_str);

    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region_str))
        .load()
        .await;

    Ok(Client::new(&config))
}

/// Spot market backed by the EC2 API
pub struct Ec2Market {
    client: Client,
}

impl Ec2Market {
    /// Wrap an existing EC2 client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a market for the given region (default region if `None`)
    pub async fn from_region(region: Option<String>) -> Result<Self> {
        Ok(Self::new(create_ec2_client(region).await?))
    }
}

#[async_trait]
impl SpotMarket for Ec2Market {
    async fn submit_spot_requests(&self, spec: &BidSpec) -> Result<Vec<CapacityRequest>> {
        let mut launch_spec = RequestSpotLaunchSpecification::builder()
            .image_id(&spec.ami_id)
            .instance_type(InstanceType::from(spec.instance_type.as_str()))
            .set_key_name(spec.key_name.clone());

        for group in &spec.security_groups {
            launch_spec = launch_spec.security_groups(group);
        }

        for (device, virtual_name) in &spec.ephemeral_devices {
            launch_spec = launch_spec.block_device_mappings(
                BlockDeviceMapping::builder()
                    .device_name(device)
                    .virtual_name(virtual_name)
                    .build(),
            );
        }

        let response = self
            .client
            .request_spot_instances()
            .spot_price(spec.bid.to_string())
            .instance_count(spec.count)
            .r#type(SpotInstanceType::OneTime)
            .launch_specification(launch_spec.build())
            .send()
            .await
            .map_err(SpotError::submission)?;

        let requests = response
            .spot_instance_requests()
            .iter()
            .filter_map(|sir| sir.spot_instance_request_id().map(str::to_string))
            .map(|id| CapacityRequest {
                id,
                bid: spec.bid,
                ami_id: spec.ami_id.clone(),
                instance_type: spec.instance_type.clone(),
                security_groups: spec.security_groups.clone(),
            })
            .collect();

        Ok(requests)
    }

    async fn describe_spot_requests(
        &self,
        request_ids: &[String],
    ) -> Result<Vec<SpotRequestStatus>> {
        let response = self
            .client
            .describe_spot_instance_requests()
            .set_spot_instance_request_ids(Some(request_ids.to_vec()))
            .send()
            .await
            .map_err(SpotError::from_ec2)?;

        let statuses = response
            .spot_instance_requests()
            .iter()
            .map(|sir| SpotRequestStatus {
                request_id: sir
                    .spot_instance_request_id()
                    .unwrap_or_default()
                    .to_string(),
                state: sir
                    .state()
                    .map(|s| RequestState::from_provider(s.as_str()))
                    .unwrap_or_else(|| RequestState::Terminal("unknown".to_string())),
                instance_id: sir.instance_id().map(str::to_string),
                fault: sir.fault().and_then(|f| f.message()).map(str::to_string),
                status_message: sir.status().and_then(|s| s.message()).map(str::to_string),
            })
            .collect();

        Ok(statuses)
    }

    async fn describe_instances(&self, instance_ids: &[String]) -> Result<Vec<InstanceDescription>> {
        let response = self
            .client
            .describe_instances()
            .set_instance_ids(Some(instance_ids.to_vec()))
            .send()
            .await
            .map_err(SpotError::from_ec2)?;

        let mut described = Vec::new();
        for reservation in response.reservations() {
            for instance in reservation.instances() {
                described.push(InstanceDescription {
                    id: instance.instance_id().unwrap_or_default().to_string(),
                    instance_type: instance
                        .instance_type()
                        .map(|t| t.as_str().to_string())
                        .unwrap_or_else(|| "unknown".to_string()),
                    private_ip: instance.private_ip_address().map(str::to_string),
                    public_ip: instance.public_ip_address().map(str::to_string),
                });
            }
        }

        Ok(described)
    }

    async fn price_history(&self, product: &str) -> Result<Vec<PriceObservation>> {
        let mut observations = Vec::new();

        let mut pages = self
            .client
            .describe_spot_price_history()
            .product_descriptions(product)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(SpotError::from_ec2)?;

            for entry in page.spot_price_history() {
                let instance_type = entry.instance_type().map(|t| t.as_str().to_string());
                let availability_zone = entry.availability_zone().map(str::to_string);
                let price = entry.spot_price().and_then(|p| p.parse::<f64>().ok());

                let (Some(instance_type), Some(availability_zone), Some(price)) =
                    (instance_type, availability_zone, price)
                else {
                    warn!("Skipping incomplete spot price entry: {:?}", entry);
                    continue;
                };

                let timestamp = entry
                    .timestamp()
                    .and_then(|t| chrono::DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
                    .unwrap_or_else(Utc::now);

                observations.push(PriceObservation {
                    instance_type,
                    availability_zone,
                    price,
                    timestamp,
                });
            }
        }

        debug!("Fetched {} spot price observations", observations.len());
        Ok(observations)
    }
}
