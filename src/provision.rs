//! Launch facade
//!
//! Composes bid submission, acquisition polling, and a final describe
//! into a single "launch and describe" operation. Any failure from the
//! composed steps propagates as-is; presentation is the caller's job.

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::acquire::{self, PollConfig};
use crate::bid::{self, BidSpec};
use crate::error::Result;
use crate::market::{InstanceDescription, SpotMarket};

/// Launch spot capacity and return a description of each instance.
///
/// Submits the bid, polls the resulting spot requests to fulfillment,
/// then enriches the assigned instance ids into full descriptions with
/// one batched lookup.
pub async fn launch(
    market: &dyn SpotMarket,
    spec: &BidSpec,
    poll: &PollConfig,
    cancel: &CancellationToken,
) -> Result<Vec<InstanceDescription>> {
    let requests = bid::submit(market, spec).await?;
    let instance_ids = acquire::resolve(market, &requests, poll, cancel).await?;

    info!("Describing {} launched instance(s)", instance_ids.len());
    market.describe_instances(&instance_ids).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bid::CapacityRequest;
    use crate::error::SpotError;
    use crate::market::{RequestState, SpotRequestStatus};
    use crate::pricing::PriceObservation;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// End-to-end fake: submission hands out request ids, the status
    /// script replays one batch per polling iteration, describe returns
    /// canned instance descriptions.
    struct FakeMarket {
        request_ids: Vec<String>,
        script: Mutex<VecDeque<Vec<SpotRequestStatus>>>,
        instances: Vec<InstanceDescription>,
    }

    #[async_trait]
    impl SpotMarket for FakeMarket {
        async fn submit_spot_requests(&self, spec: &BidSpec) -> Result<Vec<CapacityRequest>> {
            Ok(self
                .request_ids
                .iter()
                .map(|id| CapacityRequest {
                    id: id.clone(),
                    bid: spec.bid,
                    ami_id: spec.ami_id.clone(),
                    instance_type: spec.instance_type.clone(),
                    security_groups: spec.security_groups.clone(),
                })
                .collect())
        }

        async fn describe_spot_requests(
            &self,
            _request_ids: &[String],
        ) -> Result<Vec<SpotRequestStatus>> {
            let mut script = self.script.lock().unwrap();
            Ok(script.pop_front().expect("status script exhausted"))
        }

        async fn describe_instances(
            &self,
            instance_ids: &[String],
        ) -> Result<Vec<InstanceDescription>> {
            Ok(self
                .instances
                .iter()
                .filter(|i| instance_ids.contains(&i.id))
                .cloned()
                .collect())
        }

        async fn price_history(&self, _product: &str) -> Result<Vec<PriceObservation>> {
            unimplemented!("not used by launch")
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_launch_end_to_end() {
        let market = FakeMarket {
            request_ids: vec!["sir-1".to_string()],
            script: Mutex::new(
                vec![
                    vec![SpotRequestStatus {
                        request_id: "sir-1".to_string(),
                        state: RequestState::Open,
                        instance_id: None,
                        fault: None,
                        status_message: None,
                    }],
                    vec![SpotRequestStatus {
                        request_id: "sir-1".to_string(),
                        state: RequestState::Active,
                        instance_id: Some("i-123".to_string()),
                        fault: None,
                        status_message: None,
                    }],
                ]
                .into(),
            ),
            instances: vec![InstanceDescription {
                id: "i-123".to_string(),
                instance_type: "c3.2xlarge".to_string(),
                private_ip: Some("10.0.0.1".to_string()),
                public_ip: None,
            }],
        };

        let spec = BidSpec::new("ami-4b6f650e", 0.10).with_instance_type("c3.2xlarge");
        let described = launch(
            &market,
            &spec,
            &PollConfig::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(described.len(), 1);
        assert_eq!(described[0].id, "i-123");
        assert_eq!(described[0].instance_type, "c3.2xlarge");
        assert_eq!(described[0].private_ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(described[0].public_ip, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_launch_propagates_acquisition_failure() {
        let market = FakeMarket {
            request_ids: vec!["sir-1".to_string()],
            script: Mutex::new(
                vec![vec![SpotRequestStatus {
                    request_id: "sir-1".to_string(),
                    state: RequestState::Terminal("cancelled".to_string()),
                    instance_id: None,
                    fault: None,
                    status_message: Some("request cancelled by user".to_string()),
                }]]
                .into(),
            ),
            instances: vec![],
        };

        let spec = BidSpec::new("ami-4b6f650e", 0.10);
        let err = launch(
            &market,
            &spec,
            &PollConfig::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SpotError::Acquisition { .. }));
    }
}
