//! Jira wiki-markup emitter (REST API v2)

use super::classify::{Classified, LineEvent};
use super::inline::{parse_inline, render_wiki};

/// Marker Jira renders as a checked box
const CHECKED_TASK: &str = "(/)";

/// Emit wiki-markup lines for a classified event stream
pub fn emit(events: &[Classified<'_>]) -> Vec<String> {
    let mut lines = Vec::new();

    for classified in events {
        match &classified.event {
            LineEvent::Blank => lines.push(String::new()),
            LineEvent::Paragraph { text } => lines.push(inline(text)),
            LineEvent::Heading { level, text } => lines.push(format!("h{level}. {}", inline(text))),
            LineEvent::Rule => lines.push("----".to_string()),
            LineEvent::ListItem {
                depth,
                ordered,
                text,
                task,
            } => {
                let bullet = if *ordered { "#" } else { "*" };
                let marker = bullet.repeat(*depth);
                let line = match task {
                    Some(task) if task.checked => {
                        format!("{marker} {CHECKED_TASK} {}", inline(task.body))
                    }
                    Some(task) => format!("{marker} {}", inline(task.body)),
                    None => format!("{marker} {}", inline(text)),
                };
                lines.push(line);
            }
            LineEvent::Image { src, .. } => lines.push(format!("!{src}!")),
            LineEvent::CodeStart { language } => lines.push(match language {
                Some(language) => format!("{{code:{language}}}"),
                None => "{code}".to_string(),
            }),
            LineEvent::CodeLine { text } | LineEvent::QuoteLine { text } => {
                lines.push(text.to_string())
            }
            LineEvent::CodeEnd => lines.push("{code}".to_string()),
            LineEvent::QuoteStart | LineEvent::QuoteEnd => lines.push("{quote}".to_string()),
            LineEvent::TableRow { cells, header } => {
                let delimiter = if *header { "||" } else { "|" };
                lines.push(format!(
                    "{delimiter}{}{delimiter}",
                    cells.join(delimiter)
                ));
            }
            LineEvent::ListEnd | LineEvent::TableStart | LineEvent::TableEnd => {}
        }
    }

    lines
}

fn inline(text: &str) -> String {
    render_wiki(&parse_inline(text))
}
