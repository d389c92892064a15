//! Record declaration
//!
//! A record is a struct whose fields are listed in a descriptor table by the
//! [`record!`](crate::record) macro. The table drives field iteration, path
//! lookup and default diffing without language-level reflection.
//!
//! Each record type has one canonical default instance, built once from its
//! `Default` impl and never mutated. The codec omits fields equal to it when
//! saving and restores fields from it when a document omits them, so a type's
//! default values must not change while persisted data depends on them.

/// Access to a record type's canonical default instance
pub trait DefaultSet: Sized + 'static {
    fn defaults() -> &'static Self;
}

/// Declare a struct as a record node.
///
/// The struct must implement `Default`, and every listed field must be a
/// [`Node`](crate::tree::node::Node) implementing `PartialEq` and `Clone`.
///
/// ```
/// #[derive(Debug, Clone, PartialEq)]
/// struct Settings {
///     enabled: bool,
///     name: String,
///     retries: u32,
/// }
///
/// impl Default for Settings {
///     fn default() -> Self {
///         Self { enabled: true, name: "string".into(), retries: 99 }
///     }
/// }
///
/// treestore::record!(Settings { enabled, name, retries });
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::tree::record::DefaultSet for $ty {
            fn defaults() -> &'static Self {
                static DEFAULTS: ::std::sync::OnceLock<$ty> = ::std::sync::OnceLock::new();
                DEFAULTS.get_or_init(<$ty as ::std::default::Default>::default)
            }
        }

        impl $crate::tree::node::Record for $ty {
            fn field_names(&self) -> &'static [&'static str] {
                &[$(stringify!($field)),+]
            }

            fn field(&self, name: &str) -> ::std::option::Option<&dyn $crate::tree::node::Node> {
                match name {
                    $(stringify!($field) => ::std::option::Option::Some(&self.$field),)+
                    _ => ::std::option::Option::None,
                }
            }

            fn field_mut(
                &mut self,
                name: &str,
            ) -> ::std::option::Option<&mut dyn $crate::tree::node::Node> {
                match name {
                    $(stringify!($field) => ::std::option::Option::Some(&mut self.$field),)+
                    _ => ::std::option::Option::None,
                }
            }

            fn field_is_default(&self, name: &str) -> bool {
                let defaults = <$ty as $crate::tree::record::DefaultSet>::defaults();
                match name {
                    $(stringify!($field) => self.$field == defaults.$field,)+
                    _ => true,
                }
            }

            fn reset_field(&mut self, name: &str) {
                let defaults = <$ty as $crate::tree::record::DefaultSet>::defaults();
                match name {
                    $(stringify!($field) => {
                        self.$field = ::std::clone::Clone::clone(&defaults.$field);
                    })+
                    _ => {}
                }
            }
        }

        impl $crate::tree::node::Node for $ty {
            fn shape(&self) -> $crate::tree::node::Shape<'_> {
                $crate::tree::node::Shape::Record(self)
            }

            fn shape_mut(&mut self) -> $crate::tree::node::ShapeMut<'_> {
                $crate::tree::node::ShapeMut::Record(self)
            }
        }
    };
}
