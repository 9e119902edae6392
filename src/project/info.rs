//! Derived application info

use super::types::{AppInfo, ProjectConfig};
use crate::remote::Remote;
use std::sync::Arc;

/// Public-facing info derived from the configuration state.
///
/// A failed configuration load is reported as `loading: false, info: None`;
/// the error itself lives on the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedAppInfo {
    pub loading: bool,
    pub info: Option<AppInfo>,
}

impl DerivedAppInfo {
    pub fn from_state(state: &Remote<Arc<ProjectConfig>>) -> Self {
        match state {
            Remote::Loading => Self {
                loading: true,
                info: None,
            },
            Remote::Failed { .. } => Self {
                loading: false,
                info: None,
            },
            Remote::Ready(config) => Self {
                loading: false,
                info: Some(AppInfo::project(config)),
            },
        }
    }
}
