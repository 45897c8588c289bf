use iced::{Element, Subscription, Task, event, window};

use crate::loader;
use crate::media::ScrollSnapshot;
use crate::message::Message;
use crate::state::App;
use crate::ui;

impl App {
    /// Build the initial state, loading the configured video if there is one.
    pub fn boot(config: crate::config::Config) -> (Self, Task<Message>) {
        let initial = config.video.clone();
        let mut app = App::new(config);
        let task = match initial {
            Some(path) => loader::load_video_from_path(&mut app, path),
            None => Task::none(),
        };
        (app, task)
    }

    pub fn title(&self) -> String {
        match &self.video {
            Some(loaded) => format!(
                "{} - {}",
                self.config.title,
                loaded.path.file_name().unwrap_or_default().to_string_lossy()
            ),
            None => self.config.title.clone(),
        }
    }

    /// Handle UI messages and state updates.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Scrolled(viewport) => {
                self.scroll = ScrollSnapshot::from(viewport);
                if let Some(loaded) = &mut self.video {
                    loaded.handle_scroll();
                }
            }
            Message::AnimationFrame(_) => {
                if let Some(loaded) = &mut self.video {
                    loaded.handle_frame(&self.scroll);
                }
            }
            Message::MetadataReady(id) => {
                // Stale if the video was replaced before the task ran.
                if let Some(loaded) = &mut self.video {
                    loaded.handle_metadata(id);
                }
            }
            Message::BrowseFile => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Videos", loader::VIDEO_EXTENSIONS)
                    .pick_file()
                {
                    return loader::load_video_from_path(self, path);
                }
            }
            Message::EventOccurred(iced::Event::Window(window::Event::FileDropped(path))) => {
                if loader::is_video_path(&path) {
                    return loader::load_video_from_path(self, path);
                }
                log::warn!("Ignoring dropped file: {}", path.display());
            }
            Message::EventOccurred(_) => {}
        }
        Task::none()
    }

    /// Subscribe to events.
    ///
    /// The frame callback is only subscribed while a computation is pending,
    /// so an idle page does not wake the runtime every frame.
    pub fn subscription(&self) -> Subscription<Message> {
        let events = event::listen().map(Message::EventOccurred);
        if self.frame_pending() {
            Subscription::batch([events, window::frames().map(Message::AnimationFrame)])
        } else {
            events
        }
    }

    /// Render the view.
    pub fn view(&self) -> Element<'_, Message> {
        ui::render_main_view(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn boot_without_video_is_idle() {
        let (app, _task) = App::boot(Config::default());
        assert!(app.video.is_none());
        assert_eq!(app.title(), "Scrollscrub");
    }

    #[test]
    fn frames_without_video_are_ignored() {
        let mut app = App::new(Config::default());
        let _ = app.update(Message::AnimationFrame(std::time::Instant::now()));
        let _ = app.update(Message::MetadataReady(3));
        assert!(app.video.is_none());
        assert!(!app.frame_pending());
    }
}
