//! Layered configuration merge.
//!
//! A format override is laid over the shared package configuration field by
//! field: any non-empty override value replaces the base value, empty values
//! leave the base untouched. Struct impls are generated by [`impl_layer!`], which
//! destructures the override without `..` so every declared field has to be
//! listed.

use std::collections::BTreeMap;

/// A configuration value that can be overlaid by another of the same shape.
pub trait Layer {
    /// Lays `over` on top of `self`; set fields in `over` win.
    fn layer(&mut self, over: &Self);
}

impl Layer for String {
    fn layer(&mut self, over: &Self) {
        if !over.is_empty() {
            self.clone_from(over);
        }
    }
}

impl<T: Clone> Layer for Vec<T> {
    fn layer(&mut self, over: &Self) {
        if !over.is_empty() {
            self.clone_from(over);
        }
    }
}

impl<V: Clone> Layer for BTreeMap<String, V> {
    fn layer(&mut self, over: &Self) {
        for (key, value) in over {
            self.insert(key.clone(), value.clone());
        }
    }
}

/// Implements [`Layer`] for a struct by layering each named field.
///
/// The field list must be exhaustive; a missing field fails to compile.
macro_rules! impl_layer {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::bundler::settings::overrides::Layer for $ty {
            fn layer(&mut self, over: &Self) {
                let $ty { $($field),* } = over;
                $( $crate::bundler::settings::overrides::Layer::layer(&mut self.$field, $field); )*
            }
        }
    };
}

pub(crate) use impl_layer;

/// Returns `base` with `over` layered on top, leaving both untouched.
pub fn merge_layered<T: Layer + Clone>(base: &T, over: Option<&T>) -> T {
    let mut merged = base.clone();
    if let Some(over) = over {
        merged.layer(over);
    }
    merged
}
