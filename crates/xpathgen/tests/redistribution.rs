use rstest::rstest;
use xpathgen::build::{and, attr, clause, comp, document, eq, ident, s};
use xpathgen::{Comprehension, Environment, Expr, compile, normalize};

fn compiled(input: Comprehension) -> String {
    compile(input, &Environment::new()).expect("compile failure")
}

// === Written position must not matter ===

#[rstest]
#[case::condition_before_inner_clause(
    comp(
        ident("div"),
        [
            clause("span", document()).with_predicate(eq(attr(ident("span"), "name"), s("main"))),
            clause("div", ident("span")),
        ],
    )
)]
#[case::condition_after_inner_clause(
    comp(
        ident("div"),
        [
            clause("span", document()),
            clause("div", ident("span")).with_predicate(eq(attr(ident("span"), "name"), s("main"))),
        ],
    )
)]
fn outer_conditions_reach_the_outer_clause(#[case] input: Comprehension) {
    assert_eq!(compiled(input), "//span[@name='main']//div");
}

// === Conjunction dissection across clauses ===

#[rstest]
#[case::single_conjoined_condition(
    comp(
        ident("div"),
        [
            clause("span", document()),
            clause("div", ident("span")).with_predicate(and([
                eq(attr(ident("div"), "cls"), s("row")),
                eq(attr(ident("span"), "name"), s("main")),
            ])),
        ],
    )
)]
#[case::separately_written_conditions(
    comp(
        ident("div"),
        [
            clause("span", document()).with_predicate(eq(attr(ident("span"), "name"), s("main"))),
            clause("div", ident("span")).with_predicate(eq(attr(ident("div"), "cls"), s("row"))),
        ],
    )
)]
fn conjunctions_dissect_by_referenced_clause(#[case] input: Comprehension) {
    assert_eq!(compiled(input), "//span[@name='main']//div[@class='row']");
}

#[test]
fn conjuncts_on_one_clause_keep_their_order() {
    let input = comp(
        ident("a"),
        [clause("a", document()).with_predicate(and([
            eq(attr(ident("a"), "href"), s("x")),
            eq(attr(ident("a"), "name"), s("y")),
        ]))],
    );
    assert_eq!(compiled(input), "//a[@href='x' and @name='y']");
}

#[test]
fn relocated_conjuncts_land_after_the_destinations_own() {
    let input = comp(
        ident("div"),
        [
            clause("span", document()).with_predicate(eq(attr(ident("span"), "id"), s("a"))),
            clause("div", ident("span")).with_predicate(eq(attr(ident("span"), "name"), s("b"))),
        ],
    );
    assert_eq!(compiled(input), "//span[@id='a' and @name='b']//div");
}

#[test]
fn relocation_picks_the_outermost_referenced_clause() {
    let input = comp(
        ident("c"),
        [
            clause("a", document()),
            clause("b", ident("a")),
            clause("c", ident("b")).with_predicate(eq(attr(ident("a"), "id"), s("x"))),
        ],
    );
    assert_eq!(compiled(input), "//a[@id='x']//b//c");
}

#[test]
fn mixed_written_forms_fold_into_one_flat_conjunction() {
    let input = comp(
        ident("div"),
        [clause("div", document())
            .with_predicate(eq(attr(ident("div"), "id"), s("x")))
            .with_predicate(and([
                eq(attr(ident("div"), "name"), s("y")),
                eq(attr(ident("div"), "cls"), s("z")),
            ]))],
    );
    assert_eq!(compiled(input), "//div[@id='x' and @name='y' and @class='z']");
}

#[test]
fn conditions_referencing_no_clause_stay_where_written() {
    let input = comp(
        ident("div"),
        [clause("div", document()).with_predicate(eq(attr(ident("item"), "kind"), s("x")))],
    );
    assert_eq!(compiled(input), "//div[@kind='x']");
}

// === Normalization is a projection ===

#[test]
fn normalizing_twice_changes_nothing() {
    let env = Environment::new();
    let input = comp(
        ident("div"),
        [
            clause("span", document()),
            clause("div", ident("span")).with_predicate(and([
                eq(attr(ident("div"), "cls"), s("row")),
                eq(attr(ident("span"), "name"), s("main")),
            ])),
        ],
    );
    let once = normalize(input, &env).expect("normalize failure");
    let Expr::Comprehension(normalized) = once.clone() else {
        panic!("expected a comprehension");
    };
    let twice = normalize(*normalized, &env).expect("renormalize failure");
    assert_eq!(once, twice);
}
