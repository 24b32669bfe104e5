//! goatee: open files into a headless workspace and report how each was read
//!
//! Usage: goatee [--find PATTERN] [--regex] [--ignore-case] FILE...

use goatee::{Config, ContentEngine, SearchOptions, Workspace};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let config = Config::load();
    let mut workspace = Workspace::new(ContentEngine::from_config(&config));

    let mut pattern = None;
    let mut options = SearchOptions::plain(true);
    let mut paths = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--find" => match args.next() {
                Some(p) => pattern = Some(p),
                None => {
                    eprintln!("--find requires a pattern");
                    return ExitCode::FAILURE;
                }
            },
            "--regex" => options.use_regex = true,
            "--ignore-case" => options.case_sensitive = false,
            _ => paths.push(arg),
        }
    }

    let mut failed = false;
    for path in &paths {
        if let Err(e) = workspace.open(path) {
            eprintln!("{}: {}", path, e);
            failed = true;
        }
    }

    for index in 0..workspace.len() {
        let Some((doc, engine)) = workspace.get_mut(index) else {
            continue;
        };

        let language = if doc.language().is_empty() { "-" } else { doc.language() };
        let mut line = format!("{}\t{}\t{}", doc.title(), doc.encoding(), language);
        if doc.is_read_only() {
            line.push_str("\tread-only");
        }

        if let Some(pattern) = &pattern {
            match doc.find(pattern, options, engine) {
                Ok(count) => line.push_str(&format!("\t{} matches", count)),
                Err(e) => {
                    line.push_str(&format!("\t{}", e));
                    failed = true;
                }
            }
        }
        println!("{}", line);
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
