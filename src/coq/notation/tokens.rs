//! Token definitions for the notation grammar
//!
//! The notation grammar is what authors write in signatures and in `:n:` roles:
//! `@ident` holes, `{+, …}` / `{* …}` repetitions, `{? …}` optional parts, `{| a | b }`
//! alternatives and literal `{ … }` curlies. Everything else is an atom.
use logos::Logos;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    #[token("{+")]
    RepeatPlus,
    #[token("{*")]
    RepeatStar,
    #[token("{?")]
    Optional,
    #[token("{|")]
    Alternative,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("|")]
    Pipe,

    // `%{`, `%}` and `%|` stand for the literal character
    #[regex(r"%[{}|]")]
    Escaped,

    #[regex(r"@[a-zA-Z0-9_]+")]
    Hole,

    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    // A lone `@` or `%` is just text
    #[token("@")]
    #[token("%")]
    #[regex(r"[^ \t\r\n{}|@%]+")]
    Atom,
}

/// Tokenize a notation, keeping the source slice of each token
///
/// Returns the byte offset of the first unrecognized input on failure.
pub fn tokenize(source: &str) -> Result<Vec<(Token, &str, usize)>, usize> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, lexer.slice(), span.start)),
            Err(()) => return Err(span.start),
        }
    }
    Ok(tokens)
}
