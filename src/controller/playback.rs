//! Music player actions

use std::sync::Arc;

use crate::log_player_result;
use crate::model::MusicConfig;

use super::AppController;

impl AppController {
    /// Mount the player on the invitation's music, replacing any previous track.
    pub async fn mount_music(&self, music: Option<Arc<MusicConfig>>) {
        self.player.lock().await.set_music(music);
        self.sync_player_view().await;
    }

    /// Settle a pending start request; called once per UI tick.
    pub async fn poll_player(&self) {
        let result = self.player.lock().await.poll();
        if matches!(result, Ok(false)) {
            return;
        }
        log_player_result!("play", result);

        if let Err(e) = &result {
            let model = self.model.lock().await;
            model.set_error(Self::format_error(e)).await;
        }
        self.sync_player_view().await;
    }

    /// Pause, or send a start request that the next poll settles.
    pub async fn toggle_playback(&self) {
        self.player.lock().await.toggle_play();
        self.sync_player_view().await;
    }

    pub async fn toggle_mute(&self) {
        self.player.lock().await.toggle_mute();
        self.sync_player_view().await;
    }

    pub async fn set_player_expanded(&self, expanded: bool) {
        {
            let mut player = self.player.lock().await;
            if player.state().is_expanded == expanded {
                return;
            }
            player.set_expanded(expanded);
        }
        self.sync_player_view().await;
    }

    pub async fn toggle_player_expanded(&self) {
        self.player.lock().await.toggle_expanded();
        self.sync_player_view().await;
    }

    /// Release the audio resource before exit.
    pub async fn shutdown_player(&self) {
        self.player.lock().await.teardown();
        self.sync_player_view().await;
        tracing::info!("Music player shut down");
    }

    pub(crate) async fn sync_player_view(&self) {
        let view = self.player.lock().await.view();
        let model = self.model.lock().await;
        model.update_player_view(view).await;
    }
}
