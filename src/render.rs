use crate::models::ViewState;
use colored::*;

pub const TITLE: &str = "Create Your Flowchart";
pub const IDLE_TEXT: &str = "Your generated flowchart will appear here.";
pub const PENDING_TEXT: &str = "Generating your flowchart...";
pub const IMAGE_HEADING: &str = "Generated Flowchart";
pub const SAVE_HINT: &str = "Type :save to download flowchart.png";

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Muted,
    Progress,
    Error,
    Image,
    Hint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub tone: Tone,
    pub text: String,
}

impl Line {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

pub fn spinner_glyph(frame: usize) -> &'static str {
    SPINNER[frame % SPINNER.len()]
}

/// Lines for the result region. Exactly one of the idle, pending, error and
/// image regions is produced.
pub fn render(view: &ViewState, frame: usize) -> Vec<Line> {
    match view {
        ViewState::Idle => vec![Line::new(Tone::Muted, IDLE_TEXT)],
        ViewState::Pending => vec![Line::new(
            Tone::Progress,
            format!("{} {}", spinner_glyph(frame), PENDING_TEXT),
        )],
        ViewState::ShowError(message) => vec![Line::new(Tone::Error, message.clone())],
        ViewState::ShowImage(image) => vec![
            Line::new(Tone::Heading, IMAGE_HEADING),
            Line::new(Tone::Image, image.as_str()),
            Line::new(Tone::Hint, SAVE_HINT),
        ],
    }
}

pub fn paint(line: &Line) -> String {
    match line.tone {
        Tone::Heading => line.text.bright_white().bold().to_string(),
        Tone::Muted => line.text.bright_black().to_string(),
        Tone::Progress => line.text.cyan().to_string(),
        Tone::Error => line.text.red().bold().to_string(),
        Tone::Image => line.text.bright_blue().underline().to_string(),
        Tone::Hint => line.text.yellow().to_string(),
    }
}
