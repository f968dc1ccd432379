//! Gatekeeper Block Rules Validator module for Caryatid
//! Enforce the on-chain block validation rules on candidate blocks
//!
//! Settings and proposals arrive on separate topics with no ordering between
//! them. A proposal whose parent settings have not arrived yet is held and
//! validated when they do. Only when more than `max-pending-blocks` are held
//! does the module stop, with the oldest parent reported as unknown.

use anyhow::Result;
use caryatid_sdk::{module, Context, Subscription};
use config::Config;
use gatekeeper_common::{
    messages::{LedgerMessage, Message},
    validation::ValidationStatus,
    BlockInfo,
};
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};

mod configuration;
pub mod enforcer;
pub mod rules;
mod rules_validation_publisher;
mod state;
pub mod transactions;

use configuration::BlockRulesValidatorConfig;
use rules_validation_publisher::RulesValidationPublisher;
use state::State;

pub use enforcer::{enforce_validation_rules, ValidationRuleEnforcer};
pub use transactions::FlattenedTransactions;

/// Block Rules Validator module
#[module(
    message_type(Message),
    name = "block-rules-validator",
    description = "Enforce the block validation rules set on chain"
)]
pub struct BlockRulesValidator;

impl BlockRulesValidator {
    async fn publish(
        publisher: &RulesValidationPublisher,
        block_info: &BlockInfo,
        status: ValidationStatus,
    ) {
        publisher
            .publish_rules_validation(block_info, status)
            .await
            .unwrap_or_else(|e| error!("Failed to publish block rules validation: {e}"));
    }

    async fn run(
        mut state: State,
        publisher: RulesValidationPublisher,
        mut settings_subscription: Box<dyn Subscription<Message>>,
        mut block_subscription: Box<dyn Subscription<Message>>,
    ) -> Result<()> {
        loop {
            tokio::select! {
                // Settings first when both are ready
                biased;

                result = settings_subscription.read() => {
                    let (_, message) = result?;
                    match message.as_ref() {
                        Message::Ledger((block_info, LedgerMessage::SettingsUpdate(update))) => {
                            match state.handle_settings_update(update) {
                                Ok(released) => {
                                    for (held_block, status) in released {
                                        Self::publish(&publisher, &held_block, status).await;
                                    }
                                }
                                Err(e) => error!(
                                    block = block_info.number,
                                    "Settings update for {} dropped: {e}", update.state_root
                                ),
                            }
                        }
                        _ => error!("Unexpected message type: {message:?}"),
                    }
                }

                result = block_subscription.read() => {
                    let (_, message) = result?;
                    match message.as_ref() {
                        Message::Ledger((block_info, LedgerMessage::BlockProposed(proposal))) => {
                            let span = info_span!(
                                "block_rules_validator.validate",
                                block = block_info.number
                            );
                            async {
                                if let Some(status) = state.handle_block(block_info, proposal)? {
                                    Self::publish(&publisher, block_info, status).await;
                                }
                                Ok::<(), anyhow::Error>(())
                            }
                            .instrument(span)
                            .await?;
                        }
                        _ => error!("Unexpected message type: {message:?}"),
                    }
                }
            }
        }
    }

    pub async fn init(&self, context: Arc<Context<Message>>, config: Arc<Config>) -> Result<()> {
        let cfg = BlockRulesValidatorConfig::try_load(&config)?;

        // Publish topics
        info!(
            "Creating block rules validation publisher on '{}'",
            cfg.validation_publish_topic
        );

        // Subscribe topics
        info!("Creating settings subscription on '{}'", cfg.settings_subscribe_topic);
        info!("Creating block subscription on '{}'", cfg.block_subscribe_topic);
        info!("Keeping settings for {} state roots", cfg.settings_history_depth);
        info!("Holding up to {} blocks for late settings", cfg.max_pending_blocks);

        // Publishers
        let publisher =
            RulesValidationPublisher::new(context.clone(), cfg.validation_publish_topic.clone());

        // Subscribers
        let settings_subscription = context.subscribe(&cfg.settings_subscribe_topic).await?;
        let block_subscription = context.subscribe(&cfg.block_subscribe_topic).await?;

        let state = State::new(cfg.settings_history_depth, cfg.max_pending_blocks);

        // Start run task
        context.run(async move {
            Self::run(state, publisher, settings_subscription, block_subscription)
                .await
                .unwrap_or_else(|e| error!("Failed: {e}"));
        });

        Ok(())
    }
}
