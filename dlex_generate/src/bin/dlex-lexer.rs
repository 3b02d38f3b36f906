//! The runtime tool: tokenises an input file with a compiled catalogue and
//! optionally prints the token names or spellings.

use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use dlex::{DlexErrorKind, Lexer, TokenKind};
use dlex_generate::{Catalogue, GenerateOptions};

/// The token set used when no catalogue file is given: a small C-like
/// language.
const DEMO_CATALOGUE: &str = r#"
# Keywords come before the identifier that would otherwise swallow them.
TOKEN(kw_if, "if")
TOKEN(kw_else, "else")
TOKEN(kw_for, "for")
TOKEN(kw_while, "while")
TOKEN(kw_return, "return")
TOKEN(l_paren, "(")
TOKEN(r_paren, ")")
TOKEN(l_brace, "{")
TOKEN(r_brace, "}")
TOKEN(semi, ";")
TOKEN(comma, ",")
TOKEN(plus, "+")
TOKEN(minus, "-")
TOKEN(star, "*")
TOKEN(slash, "/")
TOKEN(equal, "=")
TOKEN(equal_equal, "==")
TOKEN(less, "<")
TOKEN(greater, ">")
TOKEN_REGEX(number, "[0-9]+(.[0-9]+)?")
TOKEN_REGEX(string, "\"([^\"\\\n]|\\[^\n])*\"")
TOKEN_REGEX(identifier, "[a-zA-Z_][a-zA-Z_0-9]*")
TOKEN_REGEX(comment, "//[^\n]*|/\*([^*]|\*+[^*/])*\*+/")
TOKEN_REGEX(gap, "[ \t\r\n\v]+")
"#;

#[derive(Parser, Debug)]
#[command(name = "dlex-lexer", about = "Tokenise a file with a DFA lexer")]
struct Cli {
    /// The input file to tokenise.
    input: PathBuf,

    /// Print one token kind name per line.
    #[arg(long = "print-tok-name")]
    print_tok_name: bool,

    /// Print each token's source text per line.
    #[arg(long = "print-tok-spell")]
    print_tok_spell: bool,

    /// Rerun the lex loop N times.
    #[arg(long, value_name = "N", default_value_t = 1)]
    repeat: u32,

    /// The token catalogue file. Defaults to the built-in demo catalogue.
    #[arg(long, value_name = "file")]
    catalogue: Option<PathBuf>,

    /// Emit comment tokens instead of skipping them.
    #[arg(long = "retain-comments")]
    retain_comments: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("dlex-lexer: error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let catalogue_text = match &cli.catalogue {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEMO_CATALOGUE.to_string(),
    };
    let catalogue = Catalogue::parse(&catalogue_text)?;
    let tables = dlex_generate::compile(&catalogue, &GenerateOptions::default())?;
    let input = std::fs::read_to_string(&cli.input)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for _ in 0..cli.repeat {
        let mut lexer = Lexer::new(&tables, &input).with_retain_comments(cli.retain_comments);
        loop {
            let token = match lexer.next_token() {
                Ok(token) => token,
                Err(error) => {
                    if let DlexErrorKind::UnexpectedSymbol { offset, .. } = error.kind() {
                        return Err(format!("{error} ({})", lexer.position(*offset)).into());
                    }
                    return Err(error.into());
                }
            };
            if cli.print_tok_name {
                let name = tables
                    .token_name(token.kind())
                    .unwrap_or("unknown");
                writeln!(out, "{name}")?;
            }
            if cli.print_tok_spell {
                writeln!(out, "{}", lexer.spelling(&token))?;
            }
            if token.is(TokenKind::EOF) {
                break;
            }
        }
    }
    Ok(())
}
