//! Emote data model
//!
//! Types shared by every extraction stage: stylesheet rules, ordered property
//! lists, emote keys and the three shapes an emote takes on its way through
//! the pipeline (partial, normal, custom).

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Insertion-ordered CSS declarations (property name -> raw value).
///
/// Setting a property that is already present replaces its value in place,
/// so the original declaration order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CssProperties {
    entries: IndexMap<String, String>,
}

impl CssProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Set a property, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), value.into())
    }

    /// Remove a property and return its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.shift_remove(name)
    }

    /// Copy every property of `other` into `self`; `other` wins on conflicts.
    pub fn update(&mut self, other: &CssProperties) {
        self.entries
            .extend(other.entries.iter().map(|(n, v)| (n.clone(), v.clone())));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CssProperties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect(),
        }
    }
}

/// One stylesheet rule: a selector list and its declarations, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CssRule {
    pub selectors: Vec<String>,
    pub properties: CssProperties,
}

impl CssRule {
    pub fn new(selectors: Vec<String>, properties: CssProperties) -> Self {
        Self { selectors, properties }
    }

    /// True if any selector of this rule is exactly `selector`
    pub fn has_selector(&self, selector: &str) -> bool {
        self.selectors.iter().any(|s| s == selector)
    }
}

/// Identifies one emote variant: the emote name plus an optional state suffix
/// (`:hover`, `:active`, ...). `suffix == None` is the base state.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EmoteKey {
    pub name: String,
    pub suffix: Option<String>,
}

impl EmoteKey {
    pub fn new(name: impl Into<String>, suffix: Option<String>) -> Self {
        Self { name: name.into(), suffix }
    }

    pub fn base(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    /// Name and suffix combined into one string, e.g. `ajdance:hover`.
    pub fn identifier(&self) -> String {
        combine_name_pair(&self.name, self.suffix.as_deref())
    }

    /// Key of the base emote this variant belongs to
    pub fn base_key(&self) -> EmoteKey {
        EmoteKey::base(self.name.clone())
    }
}

impl std::fmt::Display for EmoteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

/// Combine an emote name and suffix into a single identifier.
pub fn combine_name_pair(name: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!("{}{}", name, suffix),
        None => name.to_string(),
    }
}

/// One rule's contribution to an emote. After merging, the same shape holds
/// the complete definition of an emote variant.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialEmote {
    pub name: String,
    pub suffix: Option<String>,
    pub css: CssProperties,
}

impl PartialEmote {
    pub fn new(name: impl Into<String>, suffix: Option<String>, css: CssProperties) -> Self {
        Self { name: name.into(), suffix, css }
    }

    pub fn key(&self) -> EmoteKey {
        EmoteKey::new(self.name.clone(), self.suffix.clone())
    }
}

/// Merged emotes, keyed by (name, suffix)
pub type EmoteMap = BTreeMap<EmoteKey, PartialEmote>;

/// Emote drawn from a shared spritesheet image.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalEmote {
    pub name: String,
    pub suffix: Option<String>,
    /// Properties left over after the geometry was taken out
    pub css: CssProperties,
    pub image_url: String,
    /// (width, height) in pixels
    pub size: (f32, f32),
    /// background-position (x, y); `None` until the spritesheet is verified
    pub offset: Option<(f32, f32)>,
}

impl NormalEmote {
    pub fn key(&self) -> EmoteKey {
        EmoteKey::new(self.name.clone(), self.suffix.clone())
    }
}

/// Emote defined only by arbitrary CSS
#[derive(Debug, Clone, PartialEq)]
pub struct CustomEmote {
    pub name: String,
    pub suffix: Option<String>,
    pub css: CssProperties,
}

impl CustomEmote {
    pub fn key(&self) -> EmoteKey {
        EmoteKey::new(self.name.clone(), self.suffix.clone())
    }
}

impl From<PartialEmote> for CustomEmote {
    fn from(emote: PartialEmote) -> Self {
        Self { name: emote.name, suffix: emote.suffix, css: emote.css }
    }
}

/// All emotes sharing one background image
#[derive(Debug, Clone, PartialEq)]
pub struct Spritesheet {
    pub image_url: String,
    pub emotes: BTreeMap<EmoteKey, NormalEmote>,
}

impl Spritesheet {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self { image_url: image_url.into(), emotes: BTreeMap::new() }
    }
}

/// Final result of an extraction run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    /// Spritesheets keyed by image url
    pub spritesheets: BTreeMap<String, Spritesheet>,
    pub custom: BTreeMap<EmoteKey, CustomEmote>,
}

impl Catalog {
    /// Number of spritesheet-backed emotes across all sheets
    pub fn normal_count(&self) -> usize {
        self.spritesheets.values().map(|s| s.emotes.len()).sum()
    }

    /// Look up a spritesheet emote without knowing its sheet
    pub fn find_normal(&self, key: &EmoteKey) -> Option<&NormalEmote> {
        self.spritesheets.values().find_map(|s| s.emotes.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_position() {
        let mut props = CssProperties::new();
        props.insert("width", "5px");
        props.insert("height", "6px");
        assert_eq!(props.insert("width", "10px"), Some("5px".to_string()));

        let names: Vec<_> = props.names().collect();
        assert_eq!(names, vec!["width", "height"]);
        assert_eq!(props.get("width"), Some("10px"));
    }

    #[test]
    fn test_remove() {
        let mut props: CssProperties = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(props.remove("a"), Some("1".to_string()));
        assert_eq!(props.remove("a"), None);
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn test_remove_keeps_remaining_order() {
        let mut props: CssProperties =
            [("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")].into_iter().collect();
        props.remove("b");
        assert_eq!(props.names().collect::<Vec<_>>(), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_collect_repeated_name_keeps_first_position() {
        let props: CssProperties = [("w", "1"), ("h", "2"), ("w", "3")].into_iter().collect();
        assert_eq!(props.iter().collect::<Vec<_>>(), vec![("w", "3"), ("h", "2")]);
    }

    #[test]
    fn test_update_other_wins() {
        let mut base: CssProperties = [("width", "10px"), ("height", "10px")].into_iter().collect();
        let variant: CssProperties =
            [("height", "12px"), ("background-position", "0 -10px")].into_iter().collect();
        base.update(&variant);

        assert_eq!(base.get("width"), Some("10px"));
        assert_eq!(base.get("height"), Some("12px"));
        assert_eq!(base.get("background-position"), Some("0 -10px"));
        assert_eq!(base.len(), 3);
    }

    #[test]
    fn test_identifier() {
        assert_eq!(EmoteKey::base("smile").identifier(), "smile");
        assert_eq!(EmoteKey::new("ajdance", Some(":hover".to_string())).identifier(), "ajdance:hover");
    }

    #[test]
    fn test_key_ordering_puts_base_first() {
        let base = EmoteKey::base("a");
        let hover = EmoteKey::new("a", Some(":hover".to_string()));
        assert!(base < hover);
    }

    #[test]
    fn test_serialize_keeps_order() {
        let props: CssProperties = [("z", "1"), ("a", "2")].into_iter().collect();
        let json = serde_json::to_string(&props).unwrap();
        assert_eq!(json, r#"{"z":"1","a":"2"}"#);
    }
}
