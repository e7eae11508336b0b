//! Gallery grid and lightbox actions

use crate::model::ActiveSection;

use super::AppController;

impl AppController {
    pub async fn open_image(&self, index: usize) {
        let model = self.model.lock().await;
        match model.open_lightbox(index).await {
            Ok(()) => {
                model.set_active_section(ActiveSection::Gallery).await;
                tracing::debug!(index, "Lightbox opened");
            }
            Err(e) => tracing::warn!(index, error = %e, "Ignoring lightbox open"),
        }
    }

    pub async fn open_image_at_cursor(&self) {
        let model = self.model.lock().await;
        match model.open_lightbox_at_cursor().await {
            Ok(()) => tracing::debug!("Lightbox opened at cursor"),
            Err(e) => tracing::debug!(error = %e, "Empty gallery, nothing to open"),
        }
    }

    pub async fn close_lightbox(&self) {
        let model = self.model.lock().await;
        model.close_lightbox().await;
        tracing::debug!("Lightbox closed");
    }

    pub async fn next_image(&self) {
        let model = self.model.lock().await;
        let selection = model.lightbox_next().await;
        tracing::trace!(?selection, "Lightbox next");
    }

    pub async fn previous_image(&self) {
        let model = self.model.lock().await;
        let selection = model.lightbox_previous().await;
        tracing::trace!(?selection, "Lightbox previous");
    }
}
