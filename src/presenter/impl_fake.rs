use crate::library::logger::interface::Logger;
use crate::presenter::interface::{PresentedView, Presenter};
use std::error::Error;
use std::sync::{Arc, Mutex, PoisonError};

/// Remembers every view it was asked to draw.
#[derive(Clone)]
pub struct PresenterFake {
    logger: Arc<dyn Logger + Send + Sync>,
    views: Arc<Mutex<Vec<PresentedView>>>,
}

impl PresenterFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("presenter").with_namespace("fake"),
            views: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn views(&self) -> Vec<PresentedView> {
        self.views
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_view(&self) -> Option<PresentedView> {
        self.views().last().cloned()
    }
}

impl Presenter for PresenterFake {
    fn render(&mut self, view: &PresentedView) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger.info(&format!(
            "PresenterFake::render(loading: {}, text: {}, confidence: {})",
            view.is_loading, view.result_text, view.confidence_value
        ))?;
        self.views.lock().map_err(|e| e.to_string())?.push(view.clone());
        Ok(())
    }
}
