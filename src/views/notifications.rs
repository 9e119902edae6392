//! Notifications panel
//!
//! NFT returns credited to the user, newest first.

use super::render_list;
use crate::backend::Transaction;
use crate::project::UiConfig;
use crate::remote::Remote;

pub fn render_notifications(state: &Remote<Vec<Transaction>>, ui: &UiConfig) -> String {
    render_list("Notifications", state, |transactions| {
        transactions
            .iter()
            .map(|tx| {
                let detail = tx.description.as_deref().unwrap_or("NFT return received");
                format!(
                    "[{}] {} +{}",
                    tx.created_at.format("%Y-%m-%d %H:%M"),
                    detail,
                    ui.format_amount(tx.amount)
                )
            })
            .collect()
    })
}
