mod audio;
mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tokio::sync::Mutex;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};

use config::AppConfig;
use controller::AppController;
use model::{AppModel, InvitationData, MusicPlayer};
use view::{AppLayout, AppView};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let config = AppConfig::parse();
    tracing::info!(?config, "=== Invitation-RS Starting ===");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.draw(AppView::render_loading)?;

    let (invitation, load_error) = match config.load_invitation().await {
        Ok(invitation) => (invitation, None),
        Err(e) => {
            tracing::error!(error = ?e, "Could not load invitation, showing the sample");
            (InvitationData::sample(), Some(format!("Could not load invitation: {e:#}")))
        }
    };

    let audio_backend = audio::select_backend(&config);
    tracing::info!(backend = audio_backend.name(), "Audio backend ready");
    let player = Arc::new(Mutex::new(MusicPlayer::new(audio_backend)));

    let page_len = view::page_len(&invitation);
    let music = invitation.music.clone();
    let app_model = AppModel::new(invitation);
    app_model.finish_loading(page_len).await;
    if let Some(message) = load_error {
        app_model.set_error(message).await;
    }

    let model = Arc::new(Mutex::new(app_model));
    let controller = AppController::new(model.clone(), player);
    controller.mount_music(music).await;

    let res = run_app(&mut terminal, model.clone(), controller.clone()).await;

    // Release the audio device and any scroll suspension before leaving
    controller.close_lightbox().await;
    controller.shutdown_player().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Invitation-RS shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        // Settle any start request the backend has answered
        controller.poll_player().await;

        let size = terminal.size()?;
        let screen = Rect::new(0, 0, size.width, size.height);

        // Get current state
        let (invitation, ui_state, gallery, player, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors and notices (after 5 seconds)
            model_guard.auto_clear_old_messages().await;

            let invitation = model_guard.invitation();
            let layout = AppLayout::new(screen, invitation.music.is_some());
            model_guard.set_page_height(view::page_rows(layout.page)).await;

            (
                invitation,
                model_guard.get_ui_state().await,
                model_guard.get_gallery_view().await,
                model_guard.get_player_view().await,
                model_guard.should_quit().await,
            )
        };

        if should_quit {
            break;
        }

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &invitation, &ui_state, &gallery, &player);
        })?;

        // Handle input with shorter poll time for smoother UI updates
        if event::poll(Duration::from_millis(50))? {
            let result = match event::read()? {
                Event::Key(key) => controller.handle_key_event(key).await,
                Event::Mouse(mouse) => controller.handle_mouse_event(mouse, screen).await,
                _ => Ok(()),
            };
            if let Err(e) = result {
                tracing::warn!(error = %e, "Input handling failed");
            }
        }
    }

    Ok(())
}
