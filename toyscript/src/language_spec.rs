//! Builds the toyscript registry (grounded in
//! `toyscript/engine/language_spec.go`'s `BuildToyscriptLanguageSpec`):
//! the operator table, block/statement delimiters, and the `if`/
//! `while`/`def`/call parselets that the generic `langkit` core has no
//! opinion on.

use langkit::{
    LangError, LangResult, Parser, Registry, Token, ELSEIF, FUNCTION_DEFINITION,
    FUNCTION_INVOCATION, FUNCTION_PARAMETERS, NAME,
};

pub const TRUE: &str = "true";
pub const FALSE: &str = "false";

pub fn build_registry() -> Registry {
    let mut reg = Registry::new();
    reg.define_quotes('"', '"', langkit::STRING);
    reg.define_quotes('\'', '\'', langkit::STRING);
    reg.define_parens("(", ")");
    reg.define_prefix("!", 80);
    reg.define_infix("&&", 30);
    reg.define_infix("||", 20);
    reg.define_infix("=", 10);
    reg.define_infix("==", 50);
    reg.define_infix("!=", 50);
    reg.define_infix("<", 50);
    reg.define_infix(">", 50);
    reg.define_infix("<=", 50);
    reg.define_infix(">=", 50);
    reg.define_infix("+", 60);
    reg.define_infix("-", 60);
    reg.define_infix("*", 70);
    reg.define_infix("/", 70);
    reg.define_infix("%", 70);
    reg.define_statement_terminator(";");
    reg.define_empty(",");
    reg.define_block("{", "}");
    reg.define_empty("else");
    reg.define_value(TRUE);
    reg.define_value(FALSE);

    reg.define_statement("if", std::rc::Rc::new(if_std));
    reg.define_statement("while", std::rc::Rc::new(while_std));
    reg.define_statement("def", std::rc::Rc::new(def_std));
    reg.define("(", 90, 0, None, Some(std::rc::Rc::new(open_parens_led)), None);

    reg
}

/// `defineParens`'s `(` nud discards the grouping parens without
/// consuming the matching close (see `langkit::parser`'s parentheses
/// tests), so a parenthesized `if`/`while` condition leaves a `)`
/// dangling in the stream; grounded in `ifStd`/`whileStd`'s own
/// "expression parser is wonky" workaround in `language_spec.go`.
fn consume_dangling_close_paren(parser: &mut Parser) -> LangResult<()> {
    if parser.peek_symbol()? == ")" {
        parser.advance()?;
    }
    Ok(())
}

fn if_std(mut token: Token, parser: &mut Parser) -> LangResult<Token> {
    let condition = parser.expression(0)?;
    token.children.push(condition);
    consume_dangling_close_paren(parser)?;
    token.children.push(parser.block()?);

    if parser.peek_symbol()? == "else" {
        parser.advance()?;
        if parser.peek_symbol()? == "if" {
            let mut elseif = parser.statement()?;
            elseif.symbol = ELSEIF;
            token.children.push(elseif);
        } else {
            token.children.push(parser.block()?);
        }
    }
    Ok(token)
}

fn while_std(mut token: Token, parser: &mut Parser) -> LangResult<Token> {
    let condition = parser.expression(0)?;
    consume_dangling_close_paren(parser)?;
    token.children.push(condition);
    token.children.push(parser.block()?);
    Ok(token)
}

/// Grounded in `language_spec.go`'s `openParensLed`: a `(` following a
/// name (or another call's result) is a function invocation, not a
/// grouping paren. Renames the token's own symbol to
/// `(FUNCTIONINVOCATION)` the way the Go source mutates `right.Symbol`.
fn open_parens_led(mut right: Token, parser: &mut Parser, left: Token) -> LangResult<Token> {
    if left.symbol != NAME && left.symbol != "(" {
        return Err(LangError::syntax(
            format!("unexpected ( at line {}, col {}", right.line, right.col),
            right.line,
            right.col,
        ));
    }
    right.children.push(left);
    if parser.peek_symbol()? != ")" {
        loop {
            right.children.push(parser.expression(0)?);
            if parser.peek_symbol()? != "," {
                break;
            }
            parser.advance()?;
        }
        let close = parser.advance()?;
        if close.symbol != ")" {
            return Err(LangError::syntax(
                format!("unterminated parentheses with symbol {}", close.value),
                close.line,
                close.col,
            ));
        }
    } else {
        parser.advance()?;
    }
    right.symbol = FUNCTION_INVOCATION;
    Ok(right)
}

/// Grounded in `language_spec.go`'s `defStd`.
fn def_std(mut token: Token, parser: &mut Parser) -> LangResult<Token> {
    token.symbol = FUNCTION_DEFINITION;
    let name = parser.advance()?;
    if name.symbol != NAME {
        return Err(LangError::syntax(
            format!("expected identifier, got {}", name.value),
            name.line,
            name.col,
        ));
    }
    token.children.push(name);

    let open_parens = parser.advance()?;
    if open_parens.symbol != "(" {
        return Err(LangError::syntax(
            format!("expected (, got {}", open_parens.value),
            open_parens.line,
            open_parens.col,
        ));
    }

    let mut parameters = Vec::new();
    if parser.peek_symbol()? != ")" {
        loop {
            let param = parser.advance()?;
            if param.symbol != NAME {
                return Err(LangError::syntax(
                    format!("expected parameter name, got {}", param.value),
                    param.line,
                    param.col,
                ));
            }
            parameters.push(param);
            if parser.peek_symbol()? != "," {
                break;
            }
            parser.advance()?;
        }
        let close = parser.advance()?;
        if close.symbol != ")" {
            return Err(LangError::syntax(
                format!("unterminated parentheses with symbol {}", close.value),
                close.line,
                close.col,
            ));
        }
    } else {
        parser.advance()?;
    }

    let mut parameter_token = Token::new(FUNCTION_PARAMETERS);
    parameter_token.value = "(".to_string();
    parameter_token.line = open_parens.line;
    parameter_token.col = open_parens.col;
    parameter_token.arity = parameters.len();
    parameter_token.children = parameters;
    token.children.push(parameter_token);

    token.children.push(parser.block()?);
    Ok(token)
}
