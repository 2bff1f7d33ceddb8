use crate::patterns::PatternRule;

/// Every rule whose regex occurs anywhere in `line`, in rule order.
///
/// Rules are independent: one line can fire several of them.
pub fn matching_rules<'a>(
    line: &'a str,
    rules: &'a [PatternRule],
) -> impl Iterator<Item = &'a PatternRule> + 'a {
    rules.iter().filter(move |rule| rule.regex.is_match(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::parse_patterns;

    #[test]
    fn test_all_matching_rules_fire() {
        let rules = parse_patterns("any.pattern = disk\nerr.pattern = ^ERROR\nnet.pattern = socket\n");

        let hits: Vec<&str> = matching_rules("ERROR disk full", &rules)
            .map(|r| r.id.as_str())
            .collect();

        assert_eq!(hits, vec!["any", "err"]);
    }

    #[test]
    fn test_unanchored_by_default() {
        let rules = parse_patterns("err.pattern = ERROR\nwhole.pattern = ^ERROR$\n");

        let hits: Vec<&str> = matching_rules("[12:00] ERROR: x", &rules)
            .map(|r| r.id.as_str())
            .collect();

        assert_eq!(hits, vec!["err"]);
    }

    #[test]
    fn test_no_rules_no_matches() {
        assert_eq!(matching_rules("anything", &[]).count(), 0);
    }
}
