//! Top depositors panel

use super::render_list;
use crate::backend::{DepositUser, TOP_DEPOSITORS_LIMIT};
use crate::project::UiConfig;
use crate::remote::Remote;

/// Ranked list, at most five entries, in the order given
pub fn render_top_depositors(state: &Remote<Vec<DepositUser>>, ui: &UiConfig) -> String {
    render_list("Top Depositors", state, |users| {
        users
            .iter()
            .take(TOP_DEPOSITORS_LIMIT)
            .enumerate()
            .map(|(i, user)| {
                format!(
                    "#{} {} {}",
                    i + 1,
                    user.display_name(),
                    ui.format_amount(user.total_deposits)
                )
            })
            .collect()
    })
}
