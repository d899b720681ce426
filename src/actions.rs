use std::future::Future;
use std::pin::Pin;

use color_eyre::eyre::{Result, eyre};
use tokio::sync::mpsc;

use crate::data::address::Address;
use crate::data::market::MarketClient;
use crate::data::types::{ActionKind, MicroAlgos};
use crate::events::{ActionOutcome, AppEvent};
use crate::wallet::Signer;

/// A prepared marketplace call, ready for the dispatcher to run once.
pub type Action = Pin<Box<dyn Future<Output = Result<ActionOutcome>> + Send>>;

/// Prepare a create call: deploy a listing selling `quantity` units of
/// `asset_id` at `unitary_price` each. The outcome carries the new app
/// id for the UI to adopt.
pub fn create(
    signer: Signer,
    asset_id: u64,
    unitary_price: MicroAlgos,
    quantity: u64,
) -> Action {
    Box::pin(async move {
        let receipt = signer
            .create_listing(asset_id, unitary_price, quantity)
            .await?;
        Ok(ActionOutcome::Created {
            app_id: receipt.app_id,
            tx_id: receipt.tx_id,
        })
    })
}

/// Prepare a buy call for `quantity` units. The payment goes to the
/// application's own address.
pub fn buy(
    signer: Signer,
    app_id: u64,
    app_address: Address,
    quantity: u64,
    unitary_price: MicroAlgos,
) -> Action {
    Box::pin(async move {
        let receipt = signer
            .buy(app_id, &app_address, quantity, unitary_price)
            .await?;
        Ok(ActionOutcome::Purchased {
            quantity,
            tx_id: receipt.tx_id,
        })
    })
}

/// Prepare a withdraw call: delete the listing app, sweeping proceeds
/// and leftover units to the seller named in the client's sender.
pub fn withdraw(market: MarketClient) -> Action {
    Box::pin(async move {
        let signer = match market.sender() {
            Some(sender) => sender.signer.clone(),
            None => return Err(eyre!("Withdraw requires a connected wallet")),
        };
        let receipt = signer.withdraw(market.app_id()).await?;
        Ok(ActionOutcome::Withdrawn {
            tx_id: receipt.tx_id,
        })
    })
}

/// Dispatcher for prepared actions. Runs each on a background task and
/// reports its lifecycle through the app event channel; the UI re-fetches
/// canonical chain state on completion instead of patching its own.
pub struct ActionRunner {
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl ActionRunner {
    pub fn new(event_tx: mpsc::UnboundedSender<AppEvent>) -> ActionRunner {
        ActionRunner { event_tx }
    }

    pub fn run(&self, kind: ActionKind, action: Action) {
        let tx = self.event_tx.clone();
        let _ = tx.send(AppEvent::ActionStarted(kind));
        tokio::spawn(async move {
            match action.await {
                Ok(outcome) => {
                    let _ = tx.send(AppEvent::ActionCompleted { kind, outcome });
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::ActionFailed {
                        kind,
                        message: format!("{e}"),
                    });
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::algod::AlgodClient;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_runner_reports_success() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let runner = ActionRunner::new(tx);

        runner.run(
            ActionKind::Withdraw,
            Box::pin(async {
                Ok(ActionOutcome::Withdrawn {
                    tx_id: "TX1".to_string(),
                })
            }),
        );

        assert!(matches!(
            rx.recv().await,
            Some(AppEvent::ActionStarted(ActionKind::Withdraw))
        ));
        match rx.recv().await {
            Some(AppEvent::ActionCompleted {
                kind: ActionKind::Withdraw,
                outcome: ActionOutcome::Withdrawn { tx_id },
            }) => assert_eq!(tx_id, "TX1"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_runner_reports_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let runner = ActionRunner::new(tx);

        runner.run(ActionKind::Buy, Box::pin(async { Err(eyre!("no funds")) }));

        assert!(matches!(
            rx.recv().await,
            Some(AppEvent::ActionStarted(ActionKind::Buy))
        ));
        match rx.recv().await {
            Some(AppEvent::ActionFailed {
                kind: ActionKind::Buy,
                message,
            }) => assert!(message.contains("no funds")),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_withdraw_without_sender_fails() {
        let algod = Arc::new(AlgodClient::new("http://localhost:4001", None).unwrap());
        let market = MarketClient::new(algod, 1002, None);
        let result = withdraw(market).await;
        assert!(result.is_err());
    }
}
