//! Show the line classification behind a conversion

use std::path::PathBuf;

use colored::Colorize;
use jirafmt_core::markdown::{classify, LineEvent};

use crate::input::read_input;
use crate::prelude::{println, *};

#[derive(Debug, clap::Args, Clone)]
pub struct InspectOptions {
    /// Markdown file to inspect (reads stdin when omitted or `-`)
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// One-line summary of an event's payload
pub fn event_detail(event: &LineEvent<'_>) -> String {
    match event {
        LineEvent::Paragraph { text }
        | LineEvent::CodeLine { text }
        | LineEvent::QuoteLine { text } => text.to_string(),
        LineEvent::Heading { level, text } => f!("h{level} {text}"),
        LineEvent::ListItem {
            depth,
            ordered,
            text,
            task,
        } => {
            let kind = if *ordered { "ordered" } else { "bullet" };
            match task {
                Some(task) => {
                    let mark = if task.checked { "x" } else { " " };
                    f!("{kind} depth={depth} [{mark}] {}", task.body)
                }
                None => f!("{kind} depth={depth} {text}"),
            }
        }
        LineEvent::Image { alt, src, .. } => f!("{src} ({alt})"),
        LineEvent::CodeStart {
            language: Some(language),
        } => language.clone(),
        LineEvent::TableRow { cells, header } => {
            let row = cells.join(" | ");
            if *header {
                f!("header: {row}")
            } else {
                row
            }
        }
        _ => String::new(),
    }
}

pub fn handler(options: InspectOptions) -> Result<()> {
    let markdown = read_input(options.file.as_deref())?;
    let events = classify(&markdown);
    log::debug!("Classified {} events", events.len());

    if options.json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Line".bold().cyan(),
        "Event".bold().cyan(),
        "Detail".bold().cyan()
    ]);

    for classified in &events {
        let kind = classified.event.kind();
        let kind = if kind.ends_with("_start") || kind.ends_with("_end") {
            kind.bright_black().to_string()
        } else {
            kind.green().to_string()
        };
        table.add_row(prettytable::row![
            classified.line.to_string().bright_black(),
            kind,
            event_detail(&classified.event)
        ]);
    }

    table.printstd();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_detail() {
        // Arrange
        let events = classify("## Setup\n- [x] done\n```sh\n| a | b |\n");

        // Act
        let details: Vec<String> = events.iter().map(|c| event_detail(&c.event)).collect();

        // Assert
        assert_eq!(details[0], "h2 Setup");
        assert_eq!(details[1], "bullet depth=1 [x] done");
        assert_eq!(details[2], "");
        assert_eq!(details[3], "bash");
        assert_eq!(details[4], "| a | b |");
    }

    #[test]
    fn test_event_detail_table_header() {
        // Arrange
        let events = classify("| a | b |\n|---|---|\n| 1 | 2 |");

        // Act
        let details: Vec<String> = events.iter().map(|c| event_detail(&c.event)).collect();

        // Assert
        assert_eq!(details, vec!["", "header: a | b", "1 | 2", ""]);
    }
}
