//! About panel

use super::LOADING_TEXT;
use crate::project::DerivedAppInfo;

pub fn render_app_info(derived: &DerivedAppInfo) -> String {
    if derived.loading {
        return LOADING_TEXT.to_string();
    }

    match &derived.info {
        // configuration errors are reported by the loader, not here
        None => String::new(),
        Some(info) => {
            let mut lines = vec![format!("{} v{}", info.name, info.version)];
            if !info.description.is_empty() {
                lines.push(info.description.clone());
            }
            if !info.website.is_empty() {
                lines.push(info.website.clone());
            }
            lines.join("\n")
        }
    }
}
