use crate::ast::SortKey;

/// Parse a loop sort specification
///
/// Fields are comma separated and descending unless suffixed with `^`.
/// A leading `^` makes every listed field ascending. An empty spec yields
/// no keys (source order).
pub fn parse_sort(spec: &str) -> Vec<SortKey> {
    let spec = spec.trim();
    let (all_ascending, spec) = match spec.strip_prefix('^') {
        Some(rest) => (true, rest),
        None => (false, spec),
    };

    spec.split(',')
        .map(str::trim)
        .filter_map(|field| {
            let (path, suffixed) = match field.strip_suffix('^') {
                Some(path) => (path.trim(), true),
                None => (field, false),
            };
            (!path.is_empty()).then(|| SortKey {
                path: path.to_string(),
                ascending: all_ascending || suffixed,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn descending_by_default_with_suffix_override() {
        assert_eq!(
            parse_sort("stargazers_count, updated_at^"),
            vec![SortKey::desc("stargazers_count"), SortKey::asc("updated_at")]
        );
    }

    #[test]
    fn prefix_makes_every_listed_field_ascending() {
        assert_eq!(parse_sort("^a,b"), vec![SortKey::asc("a"), SortKey::asc("b")]);
        assert_eq!(parse_sort("^ title"), vec![SortKey::asc("title")]);
    }

    #[test]
    fn prefix_with_explicit_suffix_does_not_leak_into_path() {
        assert_eq!(parse_sort("^a^, b"), vec![SortKey::asc("a"), SortKey::asc("b")]);
    }

    #[test]
    fn empty_specs() {
        assert!(parse_sort("").is_empty());
        assert!(parse_sort("   ").is_empty());
        assert!(parse_sort("^").is_empty());
        assert!(parse_sort(" , ").is_empty());
    }
}
