//! Shared application state for Axum handlers.

use std::sync::Arc;

use crate::application::services::{LinkService, ResolveService, ShortenService, SweepService};
use crate::config::ShortenerSettings;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;

/// Application state injected into every handler via `State` extractor.
///
/// Services share one store handle; cloning the state only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService>,
    pub resolve_service: Arc<ResolveService>,
    pub link_service: Arc<LinkService>,
    pub sweep_service: Arc<SweepService>,
    /// Used directly only by the health probe.
    pub repository: Arc<dyn LinkRepository>,
}

impl AppState {
    /// Wires all services over a single repository.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the short code settings are unusable.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        settings: &ShortenerSettings,
    ) -> Result<Self, AppError> {
        let generator = CodeGenerator::new(&settings.alphabet, settings.code_length)?;

        Ok(Self {
            shorten_service: Arc::new(ShortenService::new(repository.clone(), generator)),
            resolve_service: Arc::new(ResolveService::new(repository.clone())),
            link_service: Arc::new(LinkService::new(
                repository.clone(),
                settings.public_base_url.as_str(),
            )),
            sweep_service: Arc::new(SweepService::new(repository.clone())),
            repository,
        })
    }
}
