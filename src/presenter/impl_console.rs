use crate::inference_pipeline::label::pct;
use crate::presenter::interface::{PresentedView, Presenter};
use std::error::Error;

const WIDTH: usize = 40;

pub struct PresenterConsole {
    last_lines: Vec<String>,
}

impl PresenterConsole {
    pub fn new() -> Self {
        Self { last_lines: vec![] }
    }

    fn lines(view: &PresentedView) -> Vec<String> {
        let preview = match &view.preview_image {
            Some(image) => format!(
                "Preview {}x{}",
                image.bitmap().width(),
                image.bitmap().height()
            ),
            None => "Capture a chest X-ray".to_string(),
        };

        vec![
            "XRayCheck".to_string(),
            preview,
            view.result_text.clone(),
            format!("Confidence {}", pct(view.confidence_value)),
        ]
    }

    fn draw(lines: &[String]) {
        println!("┌{}┐", "─".repeat(WIDTH));
        for line in lines {
            let text: String = line.chars().take(WIDTH).collect();
            let padding = WIDTH - text.chars().count();
            println!("│{}{}│", text, " ".repeat(padding));
        }
        println!("└{}┘", "─".repeat(WIDTH));
    }
}

impl Presenter for PresenterConsole {
    fn render(&mut self, view: &PresentedView) -> Result<(), Box<dyn Error + Send + Sync>> {
        let lines = Self::lines(view);
        if lines != self.last_lines {
            Self::draw(&lines);
            self.last_lines = lines;
        }
        Ok(())
    }
}
