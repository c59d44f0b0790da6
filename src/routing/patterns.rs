//! Unsecured path pattern expansion.
//!
//! Public path templates are published under every configured site prefix
//! and under the bare root. The expansion runs once at startup.

/// Expand `templates` across `prefixes` plus the empty prefix.
///
/// Each candidate is `"/" + prefix + template` with every `//` collapsed to
/// `/` in a single replace pass. Output follows (prefix, template) order but
/// callers treat it as a set.
pub fn build_unsecured_paths<T, P>(templates: &[T], prefixes: &[P]) -> Vec<String>
where
    T: AsRef<str>,
    P: AsRef<str>,
{
    let all_prefixes = prefixes
        .iter()
        .map(AsRef::as_ref)
        .chain(std::iter::once(""));

    let mut patterns = Vec::with_capacity((prefixes.len() + 1) * templates.len());
    for prefix in all_prefixes {
        for template in templates {
            let candidate = format!("/{}{}", prefix, template.as_ref());
            patterns.push(candidate.replace("//", "/"));
        }
    }

    patterns
}
