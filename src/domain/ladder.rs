// Ordered first-match decision ladders

/// One rung of a decision ladder: an outcome guarded by a predicate.
pub struct Rule<I: ?Sized, T> {
    pub predicate: fn(&I) -> bool,
    pub outcome: T,
}

impl<I: ?Sized, T> Rule<I, T> {
    pub const fn new(predicate: fn(&I) -> bool, outcome: T) -> Self {
        Self { predicate, outcome }
    }
}

/// Evaluate rules top to bottom and return the outcome of the first one whose predicate holds.
/// Later rules are never evaluated once a rule fires.
pub fn first_match<'r, I: ?Sized, T>(rules: &'r [Rule<I, T>], input: &I) -> Option<&'r T> {
    rules
        .iter()
        .find(|rule| (rule.predicate)(input))
        .map(|rule| &rule.outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        let rules: [Rule<i32, &str>; 3] = [
            Rule::new(|v: &i32| *v < 10, "small"),
            Rule::new(|v: &i32| *v < 100, "medium"),
            Rule::new(|_: &i32| true, "large"),
        ];

        assert_eq!(first_match(&rules, &5), Some(&"small"));
        assert_eq!(first_match(&rules, &10), Some(&"medium"));
        assert_eq!(first_match(&rules, &1_000), Some(&"large"));
    }

    #[test]
    fn test_no_match() {
        let rules: [Rule<i32, &str>; 1] = [Rule::new(|v: &i32| *v < 0, "negative")];
        assert_eq!(first_match(&rules, &3), None);
    }
}
