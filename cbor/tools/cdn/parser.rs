/*!
Diagnostic notation to value tree, built with chumsky
*/

use base64::prelude::*;
use chumsky::prelude::*;
use hardy_cbor_tree::{Indefinite, SimpleCode, Value};

type Span = SimpleSpan<usize>;
type Extra<'a> = extra::Err<Rich<'a, char, Span>>;
type BoxedParser<'a, T> = Boxed<'a, 'a, &'a str, T, Extra<'a>>;

/// Parses a single item of diagnostic notation
pub fn parse(input: &str) -> Result<Value, Vec<Rich<'_, char, Span>>> {
    value_parser()
        .then_ignore(end())
        .parse(input)
        .into_result()
}

fn whitespace<'a>() -> BoxedParser<'a, ()> {
    any()
        .filter(|c: &char| c.is_whitespace())
        .repeated()
        .ignored()
        .boxed()
}

fn value_parser<'a>() -> BoxedParser<'a, Value> {
    recursive(|value| {
        let value: BoxedParser<'a, Value> = value.boxed();

        // Tags and floats must be tried before plain integers
        choice((
            tagged_parser(value.clone()),
            keyword_parser(),
            simple_parser(),
            float_parser(),
            integer_parser(),
            hex_bytes_parser(),
            b64_bytes_parser(),
            text_string_parser(),
            array_parser(value.clone()),
            map_parser(value),
        ))
        .padded_by(whitespace())
    })
    .boxed()
}

/// Any integer that fits an `i128`, those outside 64 bits become bignums
fn integer_parser<'a>() -> BoxedParser<'a, Value> {
    just('-')
        .or_not()
        .then(text::int(10))
        .to_slice()
        .try_map(|s: &str, span| {
            s.parse::<i128>()
                .map(Value::Integer)
                .map_err(|e| Rich::custom(span, format!("Invalid integer: {e}")))
        })
        .labelled("integer")
        .boxed()
}

/// 1.5, -0.0, 1e300, NaN, Infinity, -Infinity
fn float_parser<'a>() -> BoxedParser<'a, Value> {
    let fraction = just('.').then(text::digits(10)).ignored();
    let exponent = one_of("eE")
        .then(one_of("+-").or_not())
        .then(text::digits(10))
        .ignored();

    let finite = just('-')
        .or_not()
        .then(text::int(10))
        .then(fraction.or_not())
        .then(exponent.or_not())
        .to_slice()
        .filter(|s: &&str| s.contains(['.', 'e', 'E']))
        .try_map(|s: &str, span| {
            s.parse::<f64>()
                .map(Value::Float)
                .map_err(|e| Rich::custom(span, format!("Invalid float: {e}")))
        });

    choice((
        text::keyword("NaN").to(Value::Float(f64::NAN)),
        text::keyword("Infinity").to(Value::Float(f64::INFINITY)),
        just('-')
            .ignore_then(text::keyword("Infinity"))
            .to(Value::Float(f64::NEG_INFINITY)),
        finite,
    ))
    .labelled("float")
    .boxed()
}

fn hex_bytes_parser<'a>() -> BoxedParser<'a, Value> {
    just("h'")
        .ignore_then(
            any()
                .filter(|c: &char| *c != '\'')
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('\''))
        .try_map(|s: String, span| {
            let digits: String = s.chars().filter(|c| !c.is_whitespace()).collect();
            hex::decode(digits)
                .map(Value::Bytes)
                .map_err(|e| Rich::custom(span, format!("Invalid hex string: {e}")))
        })
        .labelled("hex byte string")
        .boxed()
}

/// Accepts both the URL-safe and the standard alphabet, padded or not
fn b64_bytes_parser<'a>() -> BoxedParser<'a, Value> {
    just("b64'")
        .ignore_then(
            any()
                .filter(|c: &char| *c != '\'')
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('\''))
        .try_map(|s: String, span| {
            let s = s.trim_end_matches('=').replace('+', "-").replace('/', "_");
            BASE64_URL_SAFE_NO_PAD
                .decode(s)
                .map(Value::Bytes)
                .map_err(|e| Rich::custom(span, format!("Invalid base64 string: {e}")))
        })
        .labelled("base64 byte string")
        .boxed()
}

fn text_string_parser<'a>() -> BoxedParser<'a, Value> {
    let unicode = any()
        .filter(|c: &char| c.is_ascii_hexdigit())
        .repeated()
        .exactly(4)
        .to_slice()
        .try_map(|s: &str, span| {
            u32::from_str_radix(s, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| Rich::custom(span, format!("Invalid unicode escape \\u{s}")))
        });

    let escape = just('\\').ignore_then(choice((
        just('"').to('"'),
        just('\\').to('\\'),
        just('/').to('/'),
        just('b').to('\x08'),
        just('f').to('\x0c'),
        just('n').to('\n'),
        just('r').to('\r'),
        just('t').to('\t'),
        just('u').ignore_then(unicode),
    )));

    just('"')
        .ignore_then(
            escape
                .or(none_of("\"\\"))
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('"'))
        .map(Value::Text)
        .labelled("text string")
        .boxed()
}

/// Matches the optional `_` that marks an indefinite-length container
fn indefinite_marker<'a>() -> BoxedParser<'a, bool> {
    just('_')
        .padded_by(whitespace())
        .or_not()
        .map(|marker| marker.is_some())
        .boxed()
}

fn array_parser<'a>(value: BoxedParser<'a, Value>) -> BoxedParser<'a, Value> {
    just('[')
        .ignore_then(indefinite_marker())
        .then(
            value
                .separated_by(just(',').padded_by(whitespace()))
                .allow_trailing()
                .collect::<Vec<_>>()
                .padded_by(whitespace()),
        )
        .then_ignore(just(']'))
        .map(|(indefinite, items)| {
            if indefinite {
                Value::Indefinite(Indefinite::Array(items))
            } else {
                Value::Array(items)
            }
        })
        .labelled("array")
        .boxed()
}

fn map_parser<'a>(value: BoxedParser<'a, Value>) -> BoxedParser<'a, Value> {
    let entry = value
        .clone()
        .then_ignore(just(':').padded_by(whitespace()))
        .then(value);

    just('{')
        .ignore_then(indefinite_marker())
        .then(
            entry
                .separated_by(just(',').padded_by(whitespace()))
                .allow_trailing()
                .collect::<Vec<_>>()
                .padded_by(whitespace()),
        )
        .then_ignore(just('}'))
        .map(|(indefinite, pairs)| {
            if indefinite {
                Value::Indefinite(Indefinite::Map(pairs))
            } else {
                Value::Map(pairs)
            }
        })
        .labelled("map")
        .boxed()
}

/// 24(h'...')
fn tagged_parser<'a>(value: BoxedParser<'a, Value>) -> BoxedParser<'a, Value> {
    text::int(10)
        .try_map(|s: &str, span| {
            s.parse::<u64>()
                .map_err(|e| Rich::custom(span, format!("Invalid tag number: {e}")))
        })
        .then_ignore(just('(').padded_by(whitespace()))
        .then(value)
        .then_ignore(just(')'))
        .map(|(tag, value)| Value::tagged(tag, value))
        .labelled("tagged value")
        .boxed()
}

fn keyword_parser<'a>() -> BoxedParser<'a, Value> {
    choice((
        text::keyword("true").to(Value::Bool(true)),
        text::keyword("false").to(Value::Bool(false)),
        text::keyword("null").to(Value::Null),
        text::keyword("undefined").to(Value::Undefined),
    ))
    .boxed()
}

/// simple(16), codes 20 to 23 are spelt as keywords and 24 to 31 are reserved
fn simple_parser<'a>() -> BoxedParser<'a, Value> {
    text::keyword("simple")
        .ignore_then(just('(').padded_by(whitespace()))
        .ignore_then(text::int(10))
        .then_ignore(just(')').padded_by(whitespace()))
        .try_map(|s: &str, span| match s.parse::<u8>() {
            Ok(code) => SimpleCode::try_from(code).map(Value::Simple).map_err(|code| {
                Rich::custom(span, format!("Simple value {code} has no simple(N) form"))
            }),
            Err(e) => Err(Rich::custom(span, format!("Invalid simple value: {e}"))),
        })
        .labelled("simple value")
        .boxed()
}
