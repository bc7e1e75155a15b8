use std::sync::Arc;

use crate::domain::{
    models::{CompletionAck, FormType, MaintenanceId},
    ports::outbound::RatingGateway,
    RatingAggregator, RatingError, ScoreMode,
};

/// Loads the rating catalog for a maintenance form and submits the result.
pub struct MaintenanceRatingService<G> {
    gateway: Arc<G>,
    score_mode: ScoreMode,
}

impl<G: RatingGateway> MaintenanceRatingService<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            score_mode: ScoreMode::default(),
        }
    }

    pub fn with_score_mode(mut self, score_mode: ScoreMode) -> Self {
        self.score_mode = score_mode;
        self
    }

    /// Fetch the catalog and build an unrated tree for `form_type`.
    pub async fn load(&self, form_type: FormType) -> Result<RatingAggregator, RatingError> {
        let catalog = self.gateway.fetch_categories().await.map_err(|e| {
            tracing::error!("Failed to fetch rating categories: {}", e);
            RatingError::CatalogUnavailable(e.to_string())
        })?;

        let aggregator =
            RatingAggregator::new(&catalog, form_type).with_score_mode(self.score_mode);
        tracing::info!(
            form_type = %aggregator.form_type(),
            total = catalog.len(),
            retained = aggregator.entries().len(),
            "Rating catalog loaded"
        );
        Ok(aggregator)
    }

    /// Submit a fully rated tree.
    ///
    /// Incomplete trees are refused before any request is made. The tree is
    /// only borrowed, so a failed submission can be retried as is.
    pub async fn submit(
        &self,
        aggregator: &RatingAggregator,
        maintenance_id: MaintenanceId,
        temporary: bool,
    ) -> Result<(), RatingError> {
        let submission = aggregator.build_submission(maintenance_id, temporary)?;

        let ack = self
            .gateway
            .submit_completion(&submission)
            .await
            .map_err(|e| RatingError::SubmissionRejected(e.to_string()))?;

        match ack {
            CompletionAck::Successful => {
                tracing::info!(
                    maintenance_id = %submission.maintenance_id,
                    temporary,
                    score = aggregator.final_score(),
                    "Maintenance completion submitted"
                );
                Ok(())
            }
            CompletionAck::Rejected { message } => {
                tracing::warn!(
                    maintenance_id = %submission.maintenance_id,
                    "Completion rejected: {}",
                    message
                );
                Err(RatingError::SubmissionRejected(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        mock::MockRatingGateway,
        models::{Rating, RatingCategory, RatingSubCategory},
    };

    fn catalog() -> Vec<RatingCategory> {
        vec![
            RatingCategory {
                id: 1,
                title: "Housing".to_string(),
                weight_percentage: 40.0,
                sub_categories: vec![
                    RatingSubCategory {
                        id: 11,
                        title: "Seals".to_string(),
                        weight_percentage: 50.0,
                    },
                    RatingSubCategory {
                        id: 12,
                        title: "Bolts".to_string(),
                        weight_percentage: 50.0,
                    },
                ],
            },
            RatingCategory {
                id: 2,
                title: "Cleanliness".to_string(),
                weight_percentage: 60.0,
                sub_categories: vec![],
            },
        ]
    }

    #[tokio::test]
    async fn load_filters_catalog_for_form_type() {
        let service = MaintenanceRatingService::new(Arc::new(MockRatingGateway::with_catalog(
            catalog(),
        )));

        let tree = service.load(FormType::PreventiveMaintenance).await.unwrap();

        assert_eq!(tree.entries().len(), 1);
        assert_eq!(tree.entries()[0].category_id, 1);
    }

    #[tokio::test]
    async fn catalog_failure_is_blocking() {
        let service = MaintenanceRatingService::new(Arc::new(MockRatingGateway::default()));

        let err = service.load(FormType::PreventiveMaintenance).await.unwrap_err();

        assert!(matches!(err, RatingError::CatalogUnavailable(_)));
    }

    #[tokio::test]
    async fn incomplete_tree_never_reaches_the_gateway() {
        let gateway = Arc::new(MockRatingGateway::with_catalog(catalog()));
        let service = MaintenanceRatingService::new(gateway.clone());
        let mut tree = service.load(FormType::PreventiveMaintenance).await.unwrap();
        tree.rate_sub_category(1, 11, Rating::Good).unwrap();

        let err = service
            .submit(&tree, MaintenanceId::new("77"), false)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RatingError::Incomplete {
                titles: vec!["Housing".to_string()]
            }
        );
        assert!(gateway.submitted().is_empty());
    }

    #[tokio::test]
    async fn rejected_submission_keeps_the_tree_for_retry() {
        let gateway = Arc::new(
            MockRatingGateway::with_catalog(catalog()).replying(CompletionAck::Rejected {
                message: "ticket closed".to_string(),
            }),
        );
        let service = MaintenanceRatingService::new(gateway.clone());
        let mut tree = service.load("breakdown".parse().unwrap()).await.unwrap();
        tree.rate_category(2, Rating::Fair).unwrap();
        let before = tree.entries().to_vec();

        let err = service
            .submit(&tree, MaintenanceId::new("77"), false)
            .await
            .unwrap_err();

        assert_eq!(err, RatingError::SubmissionRejected("ticket closed".to_string()));
        assert_eq!(tree.entries(), before.as_slice());
        assert_eq!(gateway.submitted().len(), 1);
        assert_eq!(gateway.submitted()[0].maintenance_id.as_str(), "77");
    }

    #[tokio::test]
    async fn successful_submission_sends_ratings() {
        let gateway = Arc::new(MockRatingGateway::with_catalog(catalog()));
        let service = MaintenanceRatingService::new(gateway.clone());
        let mut tree = service.load(FormType::PreventiveMaintenance).await.unwrap();
        tree.rate_sub_category(1, 11, Rating::Good).unwrap();
        tree.rate_sub_category(1, 12, Rating::Fair).unwrap();

        service
            .submit(&tree, MaintenanceId::new("12"), true)
            .await
            .unwrap();

        let sent = gateway.submitted();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].temporary);
        let subs = sent[0].rating_data[0].sub_categories.as_ref().unwrap();
        assert_eq!(subs[1].rating, Rating::Fair);
    }
}
