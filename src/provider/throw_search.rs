//! Exception throw sites that can be searched for usages.

use crate::model::{Element, JavaModel};

/// Decides which elements stand for a searchable exception throw.
pub trait ThrowSearch: Send + Sync {
    fn is_searchable(&self, model: &JavaModel, element: Element) -> bool;

    /// Presentable name of the thrown exception type, or `""` when the
    /// element is not searchable.
    fn searchable_type_name(&self, model: &JavaModel, element: Element) -> String;
}

/// A throw site is searchable once the thrown type is known.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThrowSiteSearch;

impl ThrowSiteSearch {
    fn exception_type<'m>(model: &'m JavaModel, element: Element) -> Option<&'m str> {
        match element {
            Element::ThrowSite(id) => model
                .throw_site(id)
                .exception_type
                .as_deref()
                .filter(|t| !t.is_empty()),
            _ => None,
        }
    }
}

impl ThrowSearch for ThrowSiteSearch {
    fn is_searchable(&self, model: &JavaModel, element: Element) -> bool {
        Self::exception_type(model, element).is_some()
    }

    fn searchable_type_name(&self, model: &JavaModel, element: Element) -> String {
        Self::exception_type(model, element)
            .map(String::from)
            .unwrap_or_default()
    }
}
