use xpathgen::build::{any, attr, clause, comp, document, eq, ident, s};
use xpathgen::{Environment, compile};

// Compiles: (a.href for a in DOM
//            if a.cls == 'external' and any(p for p in a.following_siblings))
fn main() {
    let links = comp(
        attr(ident("a"), "href"),
        [clause("a", document())
            .with_predicate(eq(attr(ident("a"), "cls"), s("external")))
            .with_predicate(any(comp(
                ident("p"),
                [clause("p", attr(ident("a"), "following_siblings"))],
            )))],
    );

    match compile(links, &Environment::new()) {
        Ok(expression) => println!("{expression}"),
        Err(error) => eprintln!("compilation failed: {error}"),
    }
}
