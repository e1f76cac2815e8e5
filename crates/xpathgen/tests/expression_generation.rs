use rstest::rstest;
use xpathgen::build::{
    and, attr, clause, comp, document, eq, f, ge, gt, hyphen, i, ident, iter_slot, le, ne, not, s,
    wildcard,
};
use xpathgen::{Comprehension, Environment, compile};

fn compiled(input: Comprehension) -> String {
    compile(input, &Environment::new()).expect("compile failure")
}

// === Paths, node tests and yields ===

#[rstest]
#[case::single_clause(comp(ident("div"), [clause("div", document())]), "//div")]
#[case::nested_clauses(
    comp(ident("span"), [clause("div", document()), clause("span", ident("div"))]),
    "//div//span"
)]
#[case::class_alias_yield(
    comp(
        attr(ident("span"), "cls"),
        [clause("div", document()), clause("span", ident("div"))],
    ),
    "//div//span/@class"
)]
#[case::dunder_class_alias_yield(
    comp(attr(ident("div"), "__class__"), [clause("div", document())]),
    "//div/@class"
)]
#[case::text_yield(comp(attr(ident("span"), "text"), [clause("span", document())]), "//span/text()")]
#[case::synthetic_slot_source(comp(ident("a"), [clause("a", iter_slot())]), "//a")]
#[case::hyphenated_name_yield(
    comp(hyphen([attr(wildcard(), "data"), ident("bind")]), [clause("X", document())]),
    "//*/@data-bind"
)]
fn yields_and_paths(#[case] input: Comprehension, #[case] expected: &str) {
    assert_eq!(compiled(input), expected);
}

// === Axis accessors on clause sources ===

#[rstest]
#[case::child(comp(ident("b"), [clause("a", document()), clause("b", attr(ident("a"), "children"))]), "//a/b")]
#[case::parent_alias(
    comp(ident("b"), [clause("a", document()), clause("b", attr(ident("a"), "parents"))]),
    "//a/parent::b"
)]
#[case::descendant(
    comp(ident("b"), [clause("a", document()), clause("b", attr(ident("a"), "descendants"))]),
    "//a/descendant::b"
)]
#[case::unknown_accessor(
    comp(ident("b"), [clause("a", document()), clause("b", attr(ident("a"), "widgets"))]),
    "//a//b"
)]
#[case::sibling_then_child(
    comp(
        ident("span"),
        [
            clause("div", document()),
            clause("X", attr(ident("div"), "following_siblings")),
            clause("span", attr(ident("X"), "children")),
        ],
    ),
    "//div/following-sibling::*/span"
)]
fn axis_resolution(#[case] input: Comprehension, #[case] expected: &str) {
    assert_eq!(compiled(input), expected);
}

// === Predicates and comparison operators ===

#[rstest]
#[case::equality(
    comp(
        ident("span"),
        [clause("span", document()).with_predicate(eq(attr(ident("span"), "name"), s("main")))],
    ),
    "//span[@name='main']"
)]
#[case::inequality(
    comp(
        ident("div"),
        [clause("div", document()).with_predicate(ne(attr(ident("div"), "id"), s("main")))],
    ),
    "//div[@id!='main']"
)]
#[case::negated_equality(
    comp(
        ident("div"),
        [clause("div", document()).with_predicate(not(eq(attr(ident("div"), "id"), s("main"))))],
    ),
    "//div[not(@id='main')]"
)]
#[case::wildcard_test(
    comp(
        ident("X"),
        [clause("X", document()).with_predicate(eq(attr(ident("X"), "name"), s("main")))],
    ),
    "//*[@name='main']"
)]
#[case::bare_attribute(
    comp(ident("a"), [clause("a", document()).with_predicate(attr(ident("a"), "href"))]),
    "//a[@href]"
)]
#[case::conjoined(
    comp(
        ident("a"),
        [clause("a", document()).with_predicate(and([
            eq(attr(ident("a"), "href"), s("http://www.google.com")),
            eq(attr(ident("a"), "name"), s("goog")),
        ]))],
    ),
    "//a[@href='http://www.google.com' and @name='goog']"
)]
#[case::hyphenated_name(
    comp(
        ident("X"),
        [clause("X", document())
            .with_predicate(eq(hyphen([attr(wildcard(), "data"), ident("bind")]), s("a")))],
    ),
    "//*[@data-bind='a']"
)]
#[case::integer_literal(
    comp(
        ident("td"),
        [clause("td", document()).with_predicate(gt(attr(ident("td"), "colspan"), i(2)))],
    ),
    "//td[@colspan>2]"
)]
#[case::fractional_literal(
    comp(
        ident("img"),
        [clause("img", document()).with_predicate(ge(attr(ident("img"), "width"), f(1.5)))],
    ),
    "//img[@width>=1.5]"
)]
#[case::integral_float_literal(
    comp(
        ident("img"),
        [clause("img", document()).with_predicate(le(attr(ident("img"), "scale"), f(2.0)))],
    ),
    "//img[@scale<=2.0]"
)]
#[case::embedded_single_quote(
    comp(
        ident("a"),
        [clause("a", document()).with_predicate(eq(attr(ident("a"), "title"), s("it's")))],
    ),
    "//a[@title=\"it's\"]"
)]
fn predicate_rendering(#[case] input: Comprehension, #[case] expected: &str) {
    assert_eq!(compiled(input), expected);
}
