//! `docchat chat`: Interactive or single-message chat about a document.

use std::io::Write;
use std::path::{Path, PathBuf};

use docchat_agent::{ChatService, Reply, Session};
use docchat_config::AppConfig;
use docchat_core::{Speaker, Tone};
use docchat_documents::Upload;
use docchat_feedback::FeedbackLog;
use tokio::io::{self, AsyncBufReadExt, BufReader};

/// Flags given to `docchat chat`.
pub struct ChatOptions {
    pub file: Option<PathBuf>,
    pub tone: Option<Tone>,
    pub top_k: Option<usize>,
    pub show_context: bool,
}

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Exit,
    Ask(&'a str),
    Upload(&'a str),
    Reset,
    SetTone(&'a str),
    Tones,
    Summarize,
    Clear,
    History,
    Feedback(&'a str),
    Help,
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if matches!(line, "exit" | "quit" | "/exit" | "/quit" | ":q") {
        return Input::Exit;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Ask(line);
    };

    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map(|(n, a)| (n, a.trim()))
        .unwrap_or((command, ""));

    match name {
        "upload" => Input::Upload(arg),
        "reset" => Input::Reset,
        "tone" => Input::SetTone(arg),
        "tones" => Input::Tones,
        "summarize" | "summary" => Input::Summarize,
        "clear" => Input::Clear,
        "history" => Input::History,
        "feedback" => Input::Feedback(arg),
        "help" | "?" => Input::Help,
        _ => Input::Unknown(name),
    }
}

pub async fn run(
    options: ChatOptions,
    message: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early: give a clear error
    if !config.has_api_key() && config.default_provider != "ollama" {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables (or put it in a .env file):");
        eprintln!("    DOCCHAT_API_KEY=...   (generic)");
        eprintln!("    GEMINI_API_KEY=...    (Google Gemini, the default provider)");
        eprintln!("    OPENAI_API_KEY=...    (OpenAI)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let router = docchat_providers::build_from_config(&config);
    let provider = router.default().ok_or("No default provider configured")?;

    let mut service = ChatService::from_config(provider, &config);
    if let Some(top_k) = options.top_k {
        service = service.with_top_k(top_k);
    }

    let mut session = Session::with_tone(options.tone.unwrap_or(config.conversation.default_tone));
    let feedback = FeedbackLog::new(config.feedback_path());

    if let Some(path) = &options.file {
        upload(&service, &mut session, path)?;
    }

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let reply = service.on_submit_query(&mut session, &msg).await;
        eprint!("\r              \r");
        if options.show_context {
            print_context(&reply);
        }
        println!("{}", reply.text);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        DocChat — Interactive Mode            ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", service.provider_name());
    println!("  Model:     {}", service.model());
    println!("  Tone:      {}", session.tone());
    match session.document().source() {
        Some(source) => println!("  Document:  {} ({} chunks)", source, session.document().len()),
        None => println!("  Document:  none (use /upload PATH)"),
    }
    println!();
    println!("  Ask a question and press Enter. Type /help for commands.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Input::Empty => {}
            Input::Exit => break,
            Input::Ask(query) => {
                eprint!("  ...");
                let reply = service.on_submit_query(&mut session, query).await;
                eprint!("\r     \r");
                println!();
                if options.show_context {
                    print_context(&reply);
                }
                for line in reply.text.lines() {
                    println!("  Assistant > {line}");
                }
                println!();
            }
            Input::Upload("") => eprintln!("  Usage: /upload PATH"),
            Input::Upload(path) => {
                if let Err(e) = upload(&service, &mut session, Path::new(path)) {
                    eprintln!("  [Error] {e}");
                }
            }
            Input::Reset => println!("  {}", service.on_reset_upload(&mut session)),
            Input::SetTone(name) => match name.parse::<Tone>() {
                Ok(tone) => {
                    service.on_set_tone(&mut session, tone);
                    println!("  Tone set to {tone}.");
                }
                Err(e) => eprintln!("  [Error] {e}"),
            },
            Input::Tones => print_tones(session.tone()),
            Input::Summarize => {
                eprint!("  ...");
                let summary = service.on_summarize(&mut session).await;
                eprint!("\r     \r");
                println!();
                println!("  📝 Conversation Summary");
                for line in summary.text.lines() {
                    println!("  {line}");
                }
                println!();
            }
            Input::Clear => {
                service.on_clear_chat(&mut session);
                println!("  Chat history and uploaded file cleared.");
            }
            Input::History => print_history(&session),
            Input::Feedback(text) => match feedback.record(text) {
                Ok(_) => println!("  Thank you for your feedback!"),
                Err(e) => eprintln!("  [Error] {e}"),
            },
            Input::Help => print_help(),
            Input::Unknown(name) => eprintln!("  Unknown command '/{name}'. Type /help."),
        }

        prompt()?;
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

fn upload(
    service: &ChatService,
    session: &mut Session,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let upload = Upload::from_path(path)?;
    let outcome = service.on_upload(session, &upload)?;
    println!(
        "  {} {} → {} chunks",
        outcome.message(),
        outcome.source,
        outcome.chunks
    );
    if outcome.chunks == 0 {
        println!("  (no text found; only PDF and plain text files are read)");
    }
    Ok(())
}

fn print_context(reply: &Reply) {
    if reply.context.is_empty() {
        println!("  Context:  (no matching chunks)");
        return;
    }
    for (i, chunk) in reply.context.iter().enumerate() {
        println!("  Context [{}] {:.80}", i + 1, chunk);
    }
}

fn print_history(session: &Session) {
    if session.history().is_empty() {
        println!("  (no messages yet)");
        return;
    }
    for turn in session.history() {
        let label = match turn.speaker() {
            Speaker::User => "You",
            Speaker::Assistant => "Assistant",
        };
        println!("  [{}] {label} > {}", turn.timestamp().format("%H:%M:%S"), turn.text());
    }
}

fn print_tones(current: Tone) {
    for tone in Tone::ALL {
        let marker = if tone == current { "*" } else { " " };
        println!("  {marker} {:<13} {}", tone.name(), tone.instruction());
    }
}

fn print_help() {
    println!("  Commands:");
    println!("    /upload PATH     Upload a PDF or text file (replaces the current one)");
    println!("    /reset           Forget the uploaded file");
    println!("    /tone NAME       Change the answer tone");
    println!("    /tones           List available tones");
    println!("    /summarize       Summarize the conversation");
    println!("    /clear           Clear the chat history and the uploaded file");
    println!("    /history         Show the chat history");
    println!("    /feedback TEXT   Leave feedback");
    println!("    /help            Show this help");
    println!("    exit             Quit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_question() {
        assert_eq!(parse_input("  What is Rust?  "), Input::Ask("What is Rust?"));
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_input("   "), Input::Empty);
    }

    #[test]
    fn exit_words() {
        for word in ["exit", "quit", "/exit", "/quit", ":q"] {
            assert_eq!(parse_input(word), Input::Exit);
        }
    }

    #[test]
    fn commands_with_arguments() {
        assert_eq!(
            parse_input("/upload  docs/report.pdf "),
            Input::Upload("docs/report.pdf")
        );
        assert_eq!(parse_input("/tone formal"), Input::SetTone("formal"));
        assert_eq!(
            parse_input("/feedback Loved it, thanks"),
            Input::Feedback("Loved it, thanks")
        );
        assert_eq!(parse_input("/upload"), Input::Upload(""));
    }

    #[test]
    fn bare_commands() {
        assert_eq!(parse_input("/reset"), Input::Reset);
        assert_eq!(parse_input("/tones"), Input::Tones);
        assert_eq!(parse_input("/summarize"), Input::Summarize);
        assert_eq!(parse_input("/clear"), Input::Clear);
        assert_eq!(parse_input("/history"), Input::History);
        assert_eq!(parse_input("/help"), Input::Help);
    }

    #[test]
    fn unknown_command() {
        assert_eq!(parse_input("/frobnicate now"), Input::Unknown("frobnicate"));
    }
}
