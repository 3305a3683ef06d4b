use std::str::FromStr;

use clap::{App, Arg, ArgMatches};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use crate::diagnostics::config::TracingConfig;

// Exit Codes for different types of errors
pub const ERR_MANIFEST: i32 = 1;
pub const ERR_SEMANTIC: i32 = 2;
pub const ERR_CODEGEN: i32 = 3;
pub const ERR_OUTPUT: i32 = 4;
pub const ERR_ARGUMENT: i32 = 5;

pub fn print_errs(errs: &[String]) {
    for e in errs {
        eprintln!("{}", e);
    }
}

pub fn configure_cli() -> clap::App<'static, 'static> {
    let app = App::new("Nice9 Compiler")
        .version("0.1.0")
        .author("Erich Ess")
        .about("Compiles type checked Nice9 programs into Tiny Machine assembly")
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .required(true)
                .help("Program manifest to compile (.yaml, .yml or .json)"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .required(false)
                .help("Name the output file that the assembly will be written to. Prints to stdout when omitted."),
        )
        .arg(
            Arg::with_name("log-level")
                .long("log-level")
                .possible_values(&["off", "error", "warn", "info", "debug", "trace"])
                .takes_value(true)
                .help("Sets the level of the messages written to the terminal log"),
        )
        .arg(
            Arg::with_name("trace-codegen")
                .long("trace-codegen")
                .takes_value(true)
                .help("Prints to stderr a trace of every node the code generator visits along with the line it is being emitted at.
                Takes `all`, `off`, a line `N`, or a range `N:`, `:M` or `N:M`.")
        )
        .arg(
            Arg::with_name("emit-ast")
                .long("emit-ast")
                .takes_value(false)
                .help("Prints the validated syntax tree and stops before generating code"),
        );
    app
}

pub fn get_log_level(args: &ArgMatches) -> Option<LevelFilter> {
    match args.value_of("log-level") {
        None | Some("off") => None,
        Some("error") => Some(LevelFilter::Error),
        Some("warn") => Some(LevelFilter::Warn),
        Some("info") => Some(LevelFilter::Info),
        Some("debug") => Some(LevelFilter::Debug),
        Some("trace") => Some(LevelFilter::Trace),
        Some(_) => None,
    }
}

pub fn configure_logging(level: LevelFilter) -> Result<(), String> {
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .map_err(|e| format!("Failed to configure logger: {}", e))
}

pub fn get_codegen_tracing(args: &ArgMatches) -> Result<TracingConfig, String> {
    args.value_of("trace-codegen")
        .map(TracingConfig::from_str)
        .unwrap_or(Ok(TracingConfig::Off))
}

pub fn emit_ast(args: &ArgMatches) -> bool {
    args.is_present("emit-ast")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ArgMatches<'static> {
        configure_cli()
            .get_matches_from_safe(args.iter().copied())
            .unwrap()
    }

    #[test]
    fn test_input_is_required() {
        assert!(configure_cli()
            .get_matches_from_safe(vec!["nice9c"])
            .is_err());
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["nice9c", "-i", "prog.yaml"]);
        assert_eq!(args.value_of("input"), Some("prog.yaml"));
        assert_eq!(args.value_of("output"), None);
        assert_eq!(get_log_level(&args), None);
        assert_eq!(get_codegen_tracing(&args), Ok(TracingConfig::Off));
        assert!(!emit_ast(&args));
    }

    #[test]
    fn test_options() {
        let args = parse(&[
            "nice9c",
            "--input",
            "prog.json",
            "-o",
            "prog.tm",
            "--log-level",
            "debug",
            "--trace-codegen",
            "10:20",
            "--emit-ast",
        ]);
        assert_eq!(args.value_of("output"), Some("prog.tm"));
        assert_eq!(get_log_level(&args), Some(LevelFilter::Debug));
        assert_eq!(get_codegen_tracing(&args), Ok(TracingConfig::Between(10, 20)));
        assert!(emit_ast(&args));
    }

    #[test]
    fn test_bad_trace_range() {
        let args = parse(&["nice9c", "-i", "p.yaml", "--trace-codegen", "20:10"]);
        assert!(get_codegen_tracing(&args).is_err());
    }
}
