use flowgen::logger::{self, LogLevel, LoggerConfig};
use flowgen::render::{self, paint, Tone};
use flowgen::{Config, FileImageSaver, GenerationController, HttpGenerationService, ViewState};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

const SPINNER_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, PartialEq)]
enum Command {
    Submit(String),
    Retry,
    Save,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Command {
    match line.trim() {
        ":save" => Command::Save,
        ":retry" => Command::Retry,
        ":help" => Command::Help,
        ":quit" | ":q" => Command::Quit,
        _ => Command::Submit(line.to_string()),
    }
}

/// Terminal side of the rendering contract. Redraws only when the view
/// changes, except for the spinner which animates in place.
struct Screen {
    frame: usize,
    shown: Option<ViewState>,
}

impl Screen {
    fn new() -> Self {
        Self {
            frame: 0,
            shown: None,
        }
    }

    fn header(&self) {
        println!(
            "{}",
            paint(&render::Line {
                tone: Tone::Heading,
                text: render::TITLE.to_string(),
            })
        );
        println!("Type a description and press Enter. :help lists commands.");
    }

    fn show(&mut self, view: ViewState) {
        if self.shown.as_ref() == Some(&view) {
            return;
        }
        if self.is_pending() {
            print!("\r\x1b[2K");
        }

        self.frame = 0;
        let lines = render::render(&view, self.frame);
        if view == ViewState::Pending {
            if let Some(line) = lines.first() {
                print!("{}", paint(line));
            }
        } else {
            for line in &lines {
                println!("{}", paint(line));
            }
            print!("> ");
        }
        let _ = io::stdout().flush();
        self.shown = Some(view);
    }

    fn tick(&mut self) {
        if !self.is_pending() {
            return;
        }
        self.frame += 1;
        if let Some(line) = render::render(&ViewState::Pending, self.frame).first() {
            print!("\r{}", paint(line));
            let _ = io::stdout().flush();
        }
    }

    fn message(&self, text: &str) {
        if self.is_pending() {
            print!("\r\x1b[2K");
        }
        println!("{}", text);
        if !self.is_pending() {
            print!("> ");
        }
        let _ = io::stdout().flush();
    }

    fn is_pending(&self) -> bool {
        matches!(self.shown, Some(ViewState::Pending))
    }
}

fn help_text() -> &'static str {
    "Commands:\n  <text>   generate a flowchart from <text>\n  :retry   submit the last description again\n  :save    download the current flowchart as flowchart.png\n  :help    show this message\n  :quit    exit"
}

async fn run(controller: &mut GenerationController) -> io::Result<()> {
    let mut screen = Screen::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(SPINNER_INTERVAL);

    screen.header();
    screen.show(controller.current_view_state());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                match parse_command(&line) {
                    Command::Quit => return Ok(()),
                    Command::Help => screen.message(help_text()),
                    Command::Submit(query) => {
                        controller.update_query(query);
                        controller.submit();
                    }
                    Command::Retry => {
                        controller.submit();
                    }
                    Command::Save => match controller.save_current_image().await {
                        Ok(Some(path)) => screen.message(&format!("Saved {}", path.display())),
                        Ok(None) => screen.message("Nothing to save yet."),
                        Err(e) => {
                            log::error!("Save failed: {}", e);
                            screen.message(&format!("Could not save the flowchart: {}", e));
                        }
                    },
                }
            }
            Some(completion) = controller.next_completion() => {
                controller.apply(completion);
            }
            _ = ticker.tick() => {
                screen.tick();
            }
        }

        screen.show(controller.current_view_state());
    }

    // Input closed: let the in-flight request finish so piped usage still
    // prints a result.
    while controller.is_loading() {
        if controller.next_completion().await.map(|c| controller.apply(c)).is_none() {
            break;
        }
    }
    screen.show(controller.current_view_state());
    println!();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(
        LoggerConfig::new()
            .with_level(LogLevel::Debug)
            .with_console(false)
            .with_file_output("flowgen.log"),
    )?;

    if dotenv_loaded {
        log::info!(".env file loaded successfully");
    } else {
        log::warn!("No .env file found, using system environment variables");
    }
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    logger::log_config_info(&config);

    let service = Arc::new(HttpGenerationService::new(&config)?);
    let saver = Arc::new(FileImageSaver::new(&config.output_dir));
    let mut controller = GenerationController::new(service, saver);

    run(&mut controller).await?;

    log::info!("Shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command(":save"), Command::Save);
        assert_eq!(parse_command(" :retry "), Command::Retry);
        assert_eq!(parse_command(":help"), Command::Help);
        assert_eq!(parse_command(":q"), Command::Quit);
    }

    #[test]
    fn test_plain_lines_are_submitted_verbatim() {
        assert_eq!(
            parse_command("onboarding flow"),
            Command::Submit("onboarding flow".to_string())
        );
        assert_eq!(parse_command(""), Command::Submit(String::new()));
        assert_eq!(
            parse_command("  padded  "),
            Command::Submit("  padded  ".to_string())
        );
    }
}
