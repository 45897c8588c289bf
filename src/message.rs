use iced::Event;
use iced::widget::scrollable::Viewport;
use std::time::Instant;

#[derive(Clone, Debug)]
pub enum Message {
    /// The text panel scrolled.
    Scrolled(Viewport),
    /// The renderer is about to draw a frame.
    AnimationFrame(Instant),
    /// The video with this id has prerolled and knows its duration.
    MetadataReady(usize),
    BrowseFile,
    EventOccurred(Event),
}
