//! Line matcher for directive comments.
//!
//! Each fragment line is tried once against the directive grammar:
//!
//! ```text
//! line     = "%" ( input | extra | preamble )
//! input    = "\input{" name "}" ...
//! extra    = "extra:" ws* ( source "," destination | source )
//! preamble = ( "\usetikzlibrary" | "\usepackage" | "\newcommand"
//!            | "\renewcommand" | "\pgfplotsset" ) ...
//! ```
//!
//! Matching is anchored at the first byte of the line and is case-sensitive.
//! Anything that does not match is ordinary fragment text. Arguments are
//! returned untrimmed with their byte ranges relative to the line start, so
//! diagnostics can point at the exact text.

use std::ops::Range;

use winnow::{
    Parser as _,
    ascii::space0,
    combinator::{alt, preceded, separated_pair, terminated},
    error::ModalResult,
    stream::LocatingSlice,
    token::{literal, rest, take_till},
};

type Input<'a> = LocatingSlice<&'a str>;

/// A slice of the line and where it sits.
pub(crate) type Arg<'a> = (&'a str, Range<usize>);

/// A directive as matched on one line, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawDirective<'a> {
    /// Line text after the comment marker.
    Preamble(&'a str),
    Input(Arg<'a>),
    Extra {
        source: Arg<'a>,
        destination: Option<Arg<'a>>,
    },
}

/// Match a single line (without its line terminator).
pub(crate) fn match_line(line: &str) -> Option<RawDirective<'_>> {
    let mut input = LocatingSlice::new(line);
    directive_line(&mut input).ok()
}

fn directive_line<'a>(input: &mut Input<'a>) -> ModalResult<RawDirective<'a>> {
    preceded(
        '%',
        alt((
            input_directive.map(RawDirective::Input),
            extra_directive,
            preamble_directive.map(RawDirective::Preamble),
        )),
    )
    .parse_next(input)
}

fn input_directive<'a>(input: &mut Input<'a>) -> ModalResult<Arg<'a>> {
    preceded(
        literal(r"\input{"),
        terminated(take_till(0.., '}').with_span(), '}'),
    )
    .parse_next(input)
}

/// The two-argument form is tried first; a line without a comma falls back
/// to the single-argument form.
fn extra_directive<'a>(input: &mut Input<'a>) -> ModalResult<RawDirective<'a>> {
    preceded(
        (literal("extra:"), space0),
        alt((
            separated_pair(take_till(0.., ',').with_span(), ',', rest.with_span()).map(
                |(source, destination)| RawDirective::Extra {
                    source,
                    destination: Some(destination),
                },
            ),
            rest.with_span().map(|source| RawDirective::Extra {
                source,
                destination: None,
            }),
        )),
    )
    .parse_next(input)
}

fn preamble_directive<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    (
        alt((
            literal(r"\usetikzlibrary"),
            literal(r"\usepackage"),
            literal(r"\newcommand"),
            literal(r"\renewcommand"),
            literal(r"\pgfplotsset"),
        )),
        rest,
    )
        .take()
        .parse_next(input)
}

/// Trim surrounding whitespace from an argument, keeping its range in step.
pub(crate) fn trim_arg<'a>((text, range): Arg<'a>) -> Arg<'a> {
    let leading = text.len() - text.trim_start().len();
    let trimmed = text.trim();
    let start = range.start + leading;
    (trimmed, start..start + trimmed.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preamble_commands() {
        for line in [
            r"%\usetikzlibrary{arrows.meta}",
            r"%\usepackage{amsmath}",
            r"%\newcommand{\R}{\mathbb{R}}",
            r"%\renewcommand{\vec}[1]{\mathbf{#1}}",
            r"%\pgfplotsset{compat=1.18}",
        ] {
            assert_eq!(
                match_line(line),
                Some(RawDirective::Preamble(&line[1..])),
                "line: {line}"
            );
        }
    }

    #[test]
    fn test_preamble_requires_line_start() {
        assert_eq!(match_line(r" %\usepackage{amsmath}"), None);
        assert_eq!(match_line(r"\draw (0,0); %\usepackage{amsmath}"), None);
        assert_eq!(match_line(r"% \usepackage{amsmath}"), None);
        assert_eq!(match_line(r"\usepackage{amsmath}"), None);
    }

    #[test]
    fn test_commands_are_case_sensitive() {
        assert_eq!(match_line(r"%\UsePackage{amsmath}"), None);
        assert_eq!(match_line(r"%Extra: data.csv"), None);
        assert_eq!(match_line(r"%\Input{macros}"), None);
    }

    #[test]
    fn test_input_directive() {
        assert_eq!(
            match_line(r"%\input{macros.tex}"),
            Some(RawDirective::Input(("macros.tex", 8..18)))
        );
    }

    #[test]
    fn test_input_directive_keeps_separators_for_validation() {
        assert_eq!(
            match_line(r"%\input{a/b.tex}"),
            Some(RawDirective::Input(("a/b.tex", 8..15)))
        );
        assert_eq!(
            match_line(r"%\input{}"),
            Some(RawDirective::Input(("", 8..8)))
        );
    }

    #[test]
    fn test_unterminated_input_is_not_a_directive() {
        assert_eq!(match_line(r"%\input{macros.tex"), None);
    }

    #[test]
    fn test_extra_single_argument() {
        assert_eq!(
            match_line("%extra: points.csv"),
            Some(RawDirective::Extra {
                source: ("points.csv", 8..18),
                destination: None,
            })
        );
    }

    #[test]
    fn test_extra_without_space() {
        assert_eq!(
            match_line("%extra:points.csv"),
            Some(RawDirective::Extra {
                source: ("points.csv", 7..17),
                destination: None,
            })
        );
    }

    #[test]
    fn test_extra_two_arguments() {
        assert_eq!(
            match_line("%extra: ../shared/points.csv, data/points.csv"),
            Some(RawDirective::Extra {
                source: ("../shared/points.csv", 8..28),
                destination: Some((" data/points.csv", 29..45)),
            })
        );
    }

    #[test]
    fn test_trim_arg() {
        assert_eq!(trim_arg((" data/points.csv ", 29..46)), ("data/points.csv", 30..45));
        assert_eq!(trim_arg(("   ", 4..7)), ("", 7..7));
    }
}
