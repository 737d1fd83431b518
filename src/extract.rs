//! Emote extraction stages
//!
//! Rules flow through these functions in order:
//!
//! 1. [`filter_ignored`] - which rules sit inside an ignore region
//! 2. [`extract_partial_emotes`] - one fragment per emote selector
//! 3. [`build_emote_map`] - fragments merged per (name, suffix)
//! 4. [`collapse_specials`] - base properties copied into :hover/:active variants
//! 5. [`classify_emotes`] - spritesheet emotes vs custom emotes
//!
//! Every stage relies on rules being in stylesheet order: ignore markers take
//! effect from where they appear, and later rules override earlier ones.

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::emote::{combine_name_pair, CssRule, CustomEmote, EmoteKey, EmoteMap, PartialEmote};
use crate::selector::parse_emote_selector;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};

/// Selector that opens an ignore region
pub const IGNORE_START: &str = "START-PONYSCRIPT-IGNORE";
/// Selector that closes an ignore region
pub const IGNORE_END: &str = "END-PONYSCRIPT-IGNORE";

/// Properties an emote needs to be drawn from a spritesheet.
/// `background-position` is optional; a missing one is checked per sheet.
pub const SPRITESHEET_PROPERTIES: [&str; 3] = ["background-image", "width", "height"];

/// Work out which rules are hidden by ignore markers.
///
/// Returns one flag per rule (`true` = ignored). Both marker rules are
/// themselves ignored. A selector that shows up on both sides of a region
/// boundary is reported once per crossing occurrence.
pub fn filter_ignored(rules: &[CssRule], diags: &mut Diagnostics) -> Vec<bool> {
    let mut visible: HashSet<&str> = HashSet::new();
    let mut hidden: HashSet<&str> = HashSet::new();
    let mut ignoring = false;
    let mut flags = Vec::with_capacity(rules.len());

    for rule in rules {
        // A start marker combined with other selectors hides the whole rule
        if rule.has_selector(IGNORE_START) {
            ignoring = true;
        }

        let (add_to, refuse_in) =
            if ignoring { (&mut hidden, &visible) } else { (&mut visible, &hidden) };
        for selector in &rule.selectors {
            add_to.insert(selector.as_str());
            if refuse_in.contains(selector.as_str()) {
                diags.push(
                    Diagnostic::warning(
                        DiagnosticKind::SplitSelector,
                        format!("selector {:?} split across PONYSCRIPT-IGNORE block", selector),
                    )
                    .with_context(selector.as_str()),
                );
            }
        }

        flags.push(ignoring);

        // After the flag, so the end marker rule is still ignored
        if rule.has_selector(IGNORE_END) {
            ignoring = false;
        }
    }

    flags
}

/// Lazy sequence of partial emotes, see [`extract_partial_emotes`].
pub struct PartialEmotes<'a> {
    rules: &'a [CssRule],
    ignored: &'a [bool],
    requested: &'a HashSet<String>,
    diags: &'a mut Diagnostics,
    rule_index: usize,
    selector_index: usize,
}

impl Iterator for PartialEmotes<'_> {
    type Item = PartialEmote;

    fn next(&mut self) -> Option<PartialEmote> {
        let rules = self.rules;
        while let Some(rule) = rules.get(self.rule_index) {
            let ignored = self.ignored.get(self.rule_index).copied().unwrap_or(false);

            while let Some(selector) = rule.selectors.get(self.selector_index) {
                self.selector_index += 1;
                let Some((name, suffix)) = parse_emote_selector(selector, &mut *self.diags) else {
                    continue;
                };

                let identifier = combine_name_pair(&name, suffix.as_deref());
                let explicit = self.requested.contains(&identifier);
                if explicit {
                    self.diags.push(
                        Diagnostic::notice(
                            DiagnosticKind::ExplicitExtraction,
                            format!("extracting ignored emote {:?}", identifier),
                        )
                        .with_context(identifier),
                    );
                }
                if explicit || !ignored {
                    // Own copy, so merging never touches the source rule
                    return Some(PartialEmote::new(name, suffix, rule.properties.clone()));
                }
            }

            self.rule_index += 1;
            self.selector_index = 0;
        }
        None
    }
}

/// Turn rules into partial emotes.
///
/// `ignored` is the mask from [`filter_ignored`]; rules past its end count as
/// visible. Emotes inside an ignore region are still extracted when their
/// identifier (name + suffix, e.g. `ajdance:hover`) is in `requested`.
pub fn extract_partial_emotes<'a>(
    rules: &'a [CssRule],
    ignored: &'a [bool],
    requested: &'a HashSet<String>,
    diags: &'a mut Diagnostics,
) -> PartialEmotes<'a> {
    PartialEmotes { rules, ignored, requested, diags, rule_index: 0, selector_index: 0 }
}

/// Merge partial emotes sharing a (name, suffix) key.
///
/// Later fragments win. Every property that changes to a different value is
/// reported; re-stating the same value is silent.
pub fn build_emote_map(
    partials: impl IntoIterator<Item = PartialEmote>,
    diags: &mut Diagnostics,
) -> EmoteMap {
    let mut emotes = EmoteMap::new();

    for partial in partials {
        match emotes.entry(partial.key()) {
            Entry::Vacant(entry) => {
                entry.insert(partial);
            }
            Entry::Occupied(mut entry) => {
                let key = entry.key().clone();
                let base = &mut entry.get_mut().css;
                for (property, value) in partial.css.iter() {
                    if let Some(old) = base.get(property).filter(|old| *old != value) {
                        diags.push(
                            Diagnostic::warning(
                                DiagnosticKind::RedefinedProperty,
                                format!(
                                    "emote {:?} redefined property {:?} from base (from {:?} to {:?})",
                                    key.identifier(),
                                    property,
                                    old,
                                    value
                                ),
                            )
                            .with_context(key.identifier()),
                        );
                    }
                }
                base.update(&partial.css);
            }
        }
    }

    emotes
}

/// Copy each base emote's properties into its suffixed variants, so that
/// `ajdance:hover` carries everything `ajdance` has. Variant values win.
pub fn collapse_specials(emotes: &mut EmoteMap) {
    let variants: Vec<EmoteKey> = emotes.keys().filter(|k| k.suffix.is_some()).cloned().collect();

    for key in variants {
        let Some(base) = emotes.get(&key.base_key()) else {
            continue;
        };
        let mut merged = base.css.clone();
        if let Some(variant) = emotes.get_mut(&key) {
            merged.update(&variant.css);
            variant.css = merged;
        }
    }
}

/// Split merged emotes into spritesheet emotes and custom emotes.
///
/// An emote belongs to a spritesheet when it has all of
/// [`SPRITESHEET_PROPERTIES`]. Property maps are passed through untouched.
pub fn classify_emotes(emotes: EmoteMap) -> (EmoteMap, BTreeMap<EmoteKey, CustomEmote>) {
    let mut normal = EmoteMap::new();
    let mut custom = BTreeMap::new();

    for (key, emote) in emotes {
        // display/clear/float are too inconsistent across stylesheets to check
        if SPRITESHEET_PROPERTIES.iter().all(|p| emote.css.contains(p)) {
            normal.insert(key, emote);
        } else {
            custom.insert(key, CustomEmote::from(emote));
        }
    }

    (normal, custom)
}
