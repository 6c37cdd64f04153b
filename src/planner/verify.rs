use super::arguments::normalize;
use crate::core::{builders, Stmt};
use crate::correlate::ExpectationBinding;

type VerifyKey = (String, String, Vec<(bool, String)>);

/// One `verify(target, times(n)).method(args)` per distinct invocation,
/// in first-occurrence order, `n` counting the expectations that share it.
pub fn synthesize<'a>(expectations: impl IntoIterator<Item = &'a ExpectationBinding>) -> Vec<Stmt> {
    let mut order: Vec<(VerifyKey, &'a ExpectationBinding, usize)> = Vec::new();

    for expectation in expectations {
        let key = key_of(expectation);
        match order.iter_mut().find(|(existing, _, _)| *existing == key) {
            Some((_, _, count)) => *count += 1,
            None => order.push((key, expectation, 1)),
        }
    }

    order
        .into_iter()
        .map(|(_, expectation, count)| {
            builders::verify(
                &expectation.target,
                count,
                &expectation.method,
                normalize(&expectation.args),
            )
        })
        .collect()
}

fn key_of(expectation: &ExpectationBinding) -> VerifyKey {
    (
        expectation.target.clone(),
        expectation.method.clone(),
        expectation.args.iter().map(|a| a.key()).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Expr;
    use crate::matchers::ArgumentSpec;

    fn expectation(method: &str, args: Vec<ArgumentSpec>) -> ExpectationBinding {
        ExpectationBinding {
            target: "mockedList".into(),
            method: method.into(),
            args,
            return_value: None,
        }
    }

    fn rendered(statements: Vec<Stmt>) -> Vec<String> {
        statements.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_counts_repeated_invocations() {
        let add_one = || expectation("add", vec![ArgumentSpec::Literal(Expr::string("one"))]);
        let expectations = vec![add_one(), expectation("size", vec![]), add_one()];
        assert_eq!(
            rendered(synthesize(&expectations)),
            vec![
                "verify(mockedList, times(2)).add(\"one\");",
                "verify(mockedList, times(1)).size();",
            ]
        );
    }

    #[test]
    fn test_literal_and_matcher_with_same_text_are_distinct() {
        let expectations = vec![
            expectation("get", vec![ArgumentSpec::Literal(Expr::int(0))]),
            expectation("get", vec![ArgumentSpec::Matcher(Expr::int(0))]),
        ];
        assert_eq!(synthesize(&expectations).len(), 2);
    }
}
