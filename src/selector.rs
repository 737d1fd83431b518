//! Emote selector classification
//!
//! Emotes are referenced as `a[href|="/name"]`. A pseudo-class may sit either
//! right after the `a` (`a:hover[href="/name"]`) or at the end
//! (`a[href="/name"]:hover`). Any single comparison character is accepted
//! before `=`, since stylesheets don't agree on `|=`.

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use regex::Regex;
use std::sync::OnceLock;

/// Pseudo-classes kept as emote suffixes without complaint
const KNOWN_SUFFIXES: [&str; 2] = [":hover", ":active"];

/// Used on colored text emotes; carries no meaning for us
const DROPPED_PSEUDO_CLASS: &str = ":nth-of-type(n)";

fn emote_selector_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // ":" and "!" are allowed in names, e.g. "/pp:3" and colored text emotes
        Regex::new(r#"^a\s*(:[a-zA-Z\-()]+)?\[href.?="/([\w:!]+)"\](:[a-zA-Z\-()]+)?$"#)
            .expect("emote selector regex is valid")
    })
}

/// Classify a selector.
///
/// Returns `None` when the selector doesn't reference an emote, otherwise the
/// emote name (without the leading `/`) and its suffix.
///
/// # Examples
///
/// ```
/// use emotecss::diagnostics::Diagnostics;
/// use emotecss::selector::parse_emote_selector;
///
/// let mut diags = Diagnostics::new();
/// assert_eq!(
///     parse_emote_selector(r#"a[href|="/ajdance"]:hover"#, &mut diags),
///     Some(("ajdance".to_string(), Some(":hover".to_string())))
/// );
/// assert_eq!(parse_emote_selector(".sidebar a", &mut diags), None);
/// assert!(diags.is_empty());
/// ```
pub fn parse_emote_selector(
    selector: &str,
    diags: &mut Diagnostics,
) -> Option<(String, Option<String>)> {
    let caps = emote_selector_regex().captures(selector)?;
    let leading = caps.get(1).map(|m| m.as_str());
    let name = caps.get(2)?.as_str().to_string();
    let trailing = caps.get(3).map(|m| m.as_str());

    if leading.is_some() && trailing.is_some() {
        diags.push(
            Diagnostic::warning(
                DiagnosticKind::MultiplePseudoClasses,
                format!("selector {:?} has multiple pseudo-classes", selector),
            )
            .with_context(selector),
        );
    }

    let suffix = match leading.or(trailing) {
        None => None,
        Some(pc) if KNOWN_SUFFIXES.contains(&pc) => Some(pc.to_string()),
        Some(pc) if pc == DROPPED_PSEUDO_CLASS => None,
        Some(pc) => {
            // In practice this means :before/:after decorations
            diags.push(
                Diagnostic::warning(
                    DiagnosticKind::UnknownPseudoClass,
                    format!("unknown pseudo-class {:?} on {:?}", pc, selector),
                )
                .with_context(selector),
            );
            Some(pc.to_string())
        }
    };

    Some((name, suffix))
}
