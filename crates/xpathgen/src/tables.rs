//! Accessor lookup tables: attribute-name substitutions and the axis token
//! each traversal accessor maps to.

/// Replaces attribute spellings the comprehension syntax reserves. Both
/// aliases stand for the `class` attribute.
pub(crate) fn attribute_name(name: &str) -> &str {
    match name {
        "cls" | "__class__" => "class",
        other => other,
    }
}

/// Renders an attribute selector. The `text` accessor is a node-test
/// function, everything else an `@`-reference. The name must already be
/// substituted through [`attribute_name`].
pub(crate) fn attribute_selector(name: &str) -> String {
    if name == "text" {
        "text()".to_string()
    } else {
        format!("@{name}")
    }
}

/// Axis token for a clause whose source is an accessor on the previous
/// element. Unrecognized accessors use the descendant shorthand.
pub(crate) fn axis_token(accessor: &str) -> &'static str {
    match accessor {
        "ancestors" => "/ancestor::",
        "ancestors_or_self" => "/ancestor-or-self::",
        "children" => "/",
        "descendants" => "/descendant::",
        "descendants_or_self" => "/descendant-or-self::",
        "following" | "followings" => "/following::",
        "following_siblings" => "/following-sibling::",
        "parent" | "parents" => "/parent::",
        "preceding" | "precedings" => "/preceding::",
        "preceding_siblings" => "/preceding-sibling::",
        "self" => "/self::",
        _ => "//",
    }
}
