pub mod output;
pub mod progress;
pub mod prompt;
pub mod render;

pub use output::{ClipboardTool, OutputSink};
pub use progress::create_spinner;
pub use prompt::InputPrompt;
pub use render::{RenderStyle, RenderedOutput, Renderer};
