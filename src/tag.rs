use crate::errors::TagParseError;

/// Parsed form of a field tag: a comma-separated list of `ident(text)`
/// clauses with the recognized idents `inject` and `name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Directive<'t> {
    pub(crate) inject: bool,
    pub(crate) setter: Option<&'t str>,
    pub(crate) name: Option<&'t str>,
}

/// Parses a field tag into a [`Directive`]. A later clause of the same kind
/// overwrites an earlier one.
///
/// # Errors
/// Returns [`TagParseError`] if a clause doesn't match the `ident(text)`
/// shape or uses an unrecognized ident.
pub(crate) fn parse(tag: &str) -> Result<Directive<'_>, TagParseError> {
    let mut directive = Directive {
        inject: false,
        setter: None,
        name: None,
    };
    for clause in tag.split(',') {
        let clause = clause.trim();
        let Some((ident, rest)) = clause.split_once('(') else {
            return Err(TagParseError::new(tag));
        };
        let Some(text) = rest.strip_suffix(')') else {
            return Err(TagParseError::new(tag));
        };
        match ident {
            "inject" => {
                directive.inject = true;
                directive.setter = if text.is_empty() { None } else { Some(text) };
            }
            "name" => directive.name = Some(text),
            _ => return Err(TagParseError::new(tag)),
        }
    }
    Ok(directive)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{parse, Directive};
    use crate::errors::TagParseError;

    #[test]
    fn test_forward() {
        assert_eq!(
            parse("inject()").unwrap(),
            Directive {
                inject: true,
                setter: None,
                name: None
            }
        );
    }

    #[test]
    fn test_setter() {
        assert_eq!(
            parse("inject(SetDb)").unwrap(),
            Directive {
                inject: true,
                setter: Some("SetDb"),
                name: None
            }
        );
    }

    #[test]
    fn test_name_with_whitespace() {
        assert_eq!(
            parse(" inject() , name(primary) ").unwrap(),
            Directive {
                inject: true,
                setter: None,
                name: Some("primary")
            }
        );
    }

    #[test]
    fn test_name_without_inject() {
        assert_eq!(
            parse("name(primary)").unwrap(),
            Directive {
                inject: false,
                setter: None,
                name: Some("primary")
            }
        );
    }

    #[test]
    fn test_empty_name_text() {
        assert_eq!(parse("name()").unwrap().name, Some(""));
    }

    #[test]
    fn test_later_clause_wins() {
        let directive = parse("name(a),inject(SetDb),name(b),inject()").unwrap();

        assert_eq!(
            directive,
            Directive {
                inject: true,
                setter: None,
                name: Some("b")
            }
        );
    }

    #[test]
    fn test_malformed() {
        for tag in ["inject", "inject(", "inject()x", "()", "(x)", "timeout(5)", ""] {
            assert_eq!(parse(tag).unwrap_err(), TagParseError::new(tag), "tag: {tag:?}");
        }
    }
}
