use web_sys::HtmlElement;

use kumiwake_core::TileTag;

pub(crate) const ITEM_CLASS: &str = "kumiwake_item";

// Keep in sync with class_for below. Group 0 keeps the host page's own
// selected styling.
pub(crate) const STYLESHEET: &str = "
.kumiwake_item {
  pointer-events: auto !important;
}

.kumiwake_group1 {
  background-color: #507255 !important;
}

.kumiwake_group2 {
  background-color: #4c678a !important;
}

.kumiwake_group3 {
  background-color: #6c5c9c !important;
}
";

pub(crate) fn class_for(tag: TileTag) -> String {
    match tag {
        TileTag::Item => ITEM_CLASS.to_owned(),
        TileTag::Group(index) => format!("kumiwake_group{index}"),
    }
}

pub(crate) fn apply(element: &HtmlElement, tag: TileTag) {
    let _ = element.class_list().add_1(&class_for(tag));
}

pub(crate) fn remove(element: &HtmlElement, tag: TileTag) {
    let _ = element.class_list().remove_1(&class_for(tag));
}

// Only missing classes are added, so the attribute observer settles.
pub(crate) fn reconcile(element: &HtmlElement, expected: &[TileTag]) {
    let classes = element.class_list();
    for tag in expected {
        let class = class_for(*tag);
        if !classes.contains(&class) {
            let _ = classes.add_1(&class);
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn class_names_are_namespaced() {
        assert_eq!(class_for(TileTag::Item), "kumiwake_item");
        assert_eq!(class_for(TileTag::Group(0)), "kumiwake_group0");
        assert_eq!(class_for(TileTag::Group(3)), "kumiwake_group3");
    }
}
