//! Narrative shown in the scrolling text panel.

/// Built-in paragraphs, used when the config does not supply its own.
const NARRATIVE: &[&str] = &[
    "Every frame of the clip on the left is tied to how far you have read. \
     Scroll down and the footage moves forward; scroll back up and it rewinds.",
    "Nothing here plays on a timer. The position of the video is a pure \
     function of the position of this column, recomputed at most once per \
     rendered frame.",
    "Small nudges of the wheel are ignored until they add up to at least one \
     frame of footage, so the decoder is never asked to seek to the frame it \
     is already showing.",
    "When the clip first opens, the player is started and stopped once. Some \
     decoders only begin to honour seeks after they have produced a frame.",
    "The counter in the corner shows which frame is on screen, estimated from \
     the clip's length and the number of frames the decoder reports.",
    "If the decoder does not report a frame count, the counter assumes thirty \
     frames per second.",
    "Keep scrolling. The last paragraph lines up with the last frame.",
];

/// Paragraphs to render: the configured ones if any, else the built-in text.
pub fn paragraphs(configured: &[String]) -> Vec<&str> {
    if configured.is_empty() {
        NARRATIVE.to_vec()
    } else {
        configured.iter().map(String::as_str).collect()
    }
}
