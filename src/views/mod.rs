//! Views
//!
//! Plain-text renderers for the dashboard panels. They only format what the
//! hooks publish.

mod app_info;
mod depositors;
mod notifications;

pub use app_info::render_app_info;
pub use depositors::render_top_depositors;
pub use notifications::render_notifications;

use crate::remote::Remote;

/// Placeholder while a request is pending
pub const LOADING_TEXT: &str = "Loading...";
/// Placeholder for an empty result
pub const EMPTY_TEXT: &str = "No data available";

/// Render a titled panel around a list state; `rows` formats non-empty data
pub(crate) fn render_list<T, F>(title: &str, state: &Remote<Vec<T>>, rows: F) -> String
where
    F: Fn(&[T]) -> Vec<String>,
{
    let mut lines = vec![title.to_string()];
    match state {
        Remote::Loading => lines.push(LOADING_TEXT.to_string()),
        Remote::Failed { message } => lines.push(format!("Error: {}", message)),
        Remote::Ready(items) if items.is_empty() => lines.push(EMPTY_TEXT.to_string()),
        Remote::Ready(items) => lines.extend(rows(items)),
    }
    lines.join("\n")
}
