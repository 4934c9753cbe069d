//! Shared handler state.

use crate::service::FacilityService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FacilityService>,
}

impl AppState {
    pub fn new(service: FacilityService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
