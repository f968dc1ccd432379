use caryatid_sdk::Context;
use gatekeeper_common::{
    messages::{LedgerMessage, Message},
    validation::ValidationStatus,
    BlockInfo,
};
use std::sync::Arc;
use tracing::{debug, error};

/// Message publisher for Block Rules Validation Result
pub struct RulesValidationPublisher {
    /// Module context
    context: Arc<Context<Message>>,

    /// Topic to publish on
    topic: String,
}

impl RulesValidationPublisher {
    /// Construct with context and topic to publish on
    pub fn new(context: Arc<Context<Message>>, topic: String) -> Self {
        Self { context, topic }
    }

    pub async fn publish_rules_validation(
        &self,
        block: &BlockInfo,
        validation_status: ValidationStatus,
    ) -> anyhow::Result<()> {
        match &validation_status {
            ValidationStatus::Go => debug!("Block {} satisfies validation rules", block.number),
            ValidationStatus::NoGo(error) => {
                error!(
                    "Block rules validation failed: {} of block {}",
                    error, block.number
                );
            }
        }
        self.context
            .message_bus
            .publish(
                &self.topic,
                Arc::new(Message::Ledger((
                    block.clone(),
                    LedgerMessage::BlockValidation(validation_status),
                ))),
            )
            .await
    }
}
