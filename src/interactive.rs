// src/interactive.rs
// =============================================================================
// A line-oriented editing session.
//
// Each input line is parsed into a Command, applied to the Session, and the
// result (or the error) is printed. Errors never end the loop: the user can
// fix the command and try again.
//
// The loop is generic over BufRead/Write so tests can drive it with an
// in-memory script instead of a terminal.
// =============================================================================

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::cli::parse_link_number;
use crate::links::{LinkError, ParamUpdate};
use crate::report;
use crate::session::{LinkEdit, Session};

const HELP: &str = "\
Commands:
  links                         list the extracted links
  link <n>                      show every part of link n
  edit <n> main <url>           replace the main link
  edit <n> tracking [value]     replace (or with no value, remove) the tracking block
  edit <n> deep [value]         replace (or with no value, remove) the deep-link block
  toggle <n>                    add or remove deep linking for link n
  remove <n>                    stop editing link n (its anchor stays as it was)
  params                        show the deep-link parameters
  param <field> <value>         set deep_link, follow_redirect, utm_source, utm_medium or utm_campaign
  extract                       extract the links again from the original document
  show                          print the updated document
  original                      print the document as it was loaded
  reset                         clear the document, links and parameters
  load <path>                   replace the document with a file's contents (then run extract)
  help                          show this help
  quit                          leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Links,
    Link(usize),
    Edit(usize, LinkEdit),
    Toggle(usize),
    Remove(usize),
    Params,
    Param(ParamUpdate),
    Extract,
    Show,
    Original,
    Reset,
    Load(PathBuf),
    Help,
    Quit,
}

/// Parses one input line. Link numbers are 1-based.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = split_word(line);

    match word {
        "links" | "ls" => Ok(Command::Links),
        "link" => Ok(Command::Link(parse_link_number(rest)?)),
        "toggle" => Ok(Command::Toggle(parse_link_number(rest)?)),
        "remove" | "rm" => Ok(Command::Remove(parse_link_number(rest)?)),
        "params" => Ok(Command::Params),
        "extract" => Ok(Command::Extract),
        "show" => Ok(Command::Show),
        "original" => Ok(Command::Original),
        "reset" => Ok(Command::Reset),
        "load" if !rest.is_empty() => Ok(Command::Load(PathBuf::from(rest))),
        "load" => Err("load needs a file path".to_string()),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "edit" => parse_edit(rest),
        "param" => parse_param(rest),
        "" => Err("empty command, type 'help' for a list".to_string()),
        other => Err(format!("unknown command '{}', type 'help' for a list", other)),
    }
}

fn parse_edit(args: &str) -> Result<Command, String> {
    let (number, rest) = split_word(args);
    let (field, value) = split_word(rest);
    let index = parse_link_number(number)?;

    let edit = match field {
        "main" if !value.is_empty() => LinkEdit::MainLink(value.to_string()),
        "main" => return Err("edit <n> main needs a URL".to_string()),
        "tracking" => LinkEdit::TrackingParam(Some(value.to_string())),
        "deep" => LinkEdit::DeepLink(value.to_string()),
        other => return Err(format!("unknown link field '{}' (main, tracking, deep)", other)),
    };
    Ok(Command::Edit(index, edit))
}

fn parse_param(args: &str) -> Result<Command, String> {
    let (field, value) = split_word(args);

    let update = match field {
        "deep_link" => ParamUpdate::DeepLink(parse_flag(value)?),
        "follow_redirect" => ParamUpdate::FollowRedirect(parse_flag(value)?),
        "utm_source" => ParamUpdate::UtmSource(value.to_string()),
        "utm_medium" => ParamUpdate::UtmMedium(value.to_string()),
        "utm_campaign" => ParamUpdate::UtmCampaign(value.to_string()),
        other => return Err(format!("unknown parameter '{}'", other)),
    };
    Ok(Command::Param(update))
}

fn parse_flag(value: &str) -> Result<bool, String> {
    value
        .parse()
        .map_err(|_| format!("expected true or false, got '{}'", value))
}

// First whitespace-separated word and the trimmed remainder
fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

/// Applies a command and returns the text to print, or an error message
pub fn execute(session: &mut Session, command: Command) -> Result<String, String> {
    let err = |e: LinkError| e.to_string();

    match command {
        Command::Links => Ok(report::format_links(session.links())),
        Command::Link(index) => session
            .links()
            .get(index)
            .map(|link| report::format_link_detail(index + 1, link))
            .ok_or_else(|| err(LinkError::UnknownLink(index))),
        Command::Edit(index, edit) => {
            session.edit_link(index, edit).map_err(err)?;
            Ok(format!("Link {} updated.", index + 1))
        }
        Command::Toggle(index) => {
            session.toggle_deep_link(index).map_err(err)?;
            let state = if session.links()[index].has_deep_link() {
                "on"
            } else {
                "off"
            };
            Ok(format!("Deep linking {} for link {}.", state, index + 1))
        }
        Command::Remove(index) => {
            let removed = session.remove_link(index).map_err(err)?;
            Ok(format!("Removed link {} ({}).", index + 1, removed.full_url))
        }
        Command::Params => Ok(match session.params() {
            Some(params) => report::format_params(params),
            None => "No deep-link parameters yet. Toggle a link or set a param.".to_string(),
        }),
        Command::Param(update) => {
            session.update_param(update);
            Ok("Parameter updated. It applies to links toggled on from now.".to_string())
        }
        Command::Extract => {
            let count = session.extract().map_err(err)?;
            Ok(format!("Successfully extracted {} links.", count))
        }
        Command::Show => Ok(session.updated_content()),
        Command::Original => Ok(session.original_content().to_string()),
        Command::Reset => {
            session.reset();
            Ok("Session reset. Use 'load <path>' to start on a new document.".to_string())
        }
        Command::Load(path) => {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
            // Links from the previous document are dropped; extract finds the new ones
            session.load(content);
            Ok(format!(
                "Loaded {}. Run 'extract' to find its links.",
                path.display()
            ))
        }
        Command::Help => Ok(HELP.to_string()),
        Command::Quit => Ok(String::new()),
    }
}

/// Runs the read-eval-print loop until `quit` or end of input
pub fn run<R: BufRead, W: Write>(session: &mut Session, input: R, mut output: W) -> io::Result<()> {
    writeln!(output, "Type 'help' for commands.")?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let outcome = parse_command(&line).and_then(|command| {
            if command == Command::Quit {
                return Ok(None);
            }
            execute(session, command).map(Some)
        });

        match outcome {
            Ok(None) => break,
            Ok(Some(text)) => writeln!(output, "{}", text.trim_end())?,
            Err(message) => writeln!(output, "❌ {}", message)?,
        }
        output.flush()?;
    }

    Ok(())
}
