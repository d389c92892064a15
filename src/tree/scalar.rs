//! Scalar leaves and association keys
//!
//! Scalars convert through `serde`: any type implementing `Serialize` and
//! `DeserializeOwned` can become a leaf with [`scalar_node!`](crate::scalar_node).
//! Association keys implement [`MapKey`]; `String` keys map directly onto
//! document object keys, every other key type is foreign-keyed.

use crate::tree::node::{KeyNode, KeyStyle, Node, Scalar, Shape, ShapeMut};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declare serde-convertible types as scalar tree leaves.
///
/// ```
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
/// enum Mode {
///     #[default]
///     Auto,
///     Manual,
/// }
///
/// treestore::scalar_node!(Mode);
/// ```
#[macro_export]
macro_rules! scalar_node {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::tree::node::Scalar for $ty {
                fn to_value(
                    &self,
                ) -> ::std::result::Result<$crate::__private::serde_json::Value, ::std::string::String>
                {
                    $crate::__private::serde_json::to_value(self).map_err(|e| e.to_string())
                }

                fn set_from_value(
                    &mut self,
                    value: &$crate::__private::serde_json::Value,
                ) -> ::std::result::Result<(), ::std::string::String> {
                    *self = <$ty as $crate::__private::serde::Deserialize>::deserialize(value)
                        .map_err(|e| e.to_string())?;
                    Ok(())
                }
            }

            impl $crate::tree::node::Node for $ty {
                fn shape(&self) -> $crate::tree::node::Shape<'_> {
                    $crate::tree::node::Shape::Scalar(self)
                }

                fn shape_mut(&mut self) -> $crate::tree::node::ShapeMut<'_> {
                    $crate::tree::node::ShapeMut::Scalar(self)
                }
            }
        )+
    };
}

/// Declare `Display + FromStr + serde` types as foreign-keyed association keys.
#[macro_export]
macro_rules! map_key {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::tree::scalar::MapKey for $ty {
                const STYLE: $crate::tree::node::KeyStyle =
                    $crate::tree::node::KeyStyle::ForeignKeyed;

                fn key_text(&self) -> ::std::string::String {
                    ::std::string::ToString::to_string(self)
                }

                fn parse_key(text: &str) -> ::std::result::Result<Self, ::std::string::String> {
                    <$ty as ::std::str::FromStr>::from_str(text).map_err(|e| e.to_string())
                }

                fn key_value(
                    &self,
                ) -> ::std::result::Result<$crate::__private::serde_json::Value, ::std::string::String>
                {
                    $crate::__private::serde_json::to_value(self).map_err(|e| e.to_string())
                }

                fn from_key_value(
                    value: &$crate::__private::serde_json::Value,
                ) -> ::std::result::Result<Self, ::std::string::String> {
                    <$ty as $crate::__private::serde::Deserialize>::deserialize(value)
                        .map_err(|e| e.to_string())
                }
            }
        )+
    };
}

crate::scalar_node!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, char, String, Value,
);

crate::map_key!(bool, char, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// `None` is stored as `null`.
impl<T> Scalar for Option<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn to_value(&self) -> Result<Value, String> {
        serde_json::to_value(self).map_err(|e| e.to_string())
    }

    fn set_from_value(&mut self, value: &Value) -> Result<(), String> {
        *self = Option::<T>::deserialize(value).map_err(|e| e.to_string())?;
        Ok(())
    }
}

impl<T> Node for Option<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(self)
    }

    fn shape_mut(&mut self) -> ShapeMut<'_> {
        ShapeMut::Scalar(self)
    }
}

/// Key type of an association
pub trait MapKey: Sized + 'static {
    const STYLE: KeyStyle;

    fn key_text(&self) -> String;

    fn parse_key(text: &str) -> Result<Self, String>;

    fn key_value(&self) -> Result<Value, String>;

    fn from_key_value(value: &Value) -> Result<Self, String>;
}

impl MapKey for String {
    const STYLE: KeyStyle = KeyStyle::StringKeyed;

    fn key_text(&self) -> String {
        self.clone()
    }

    fn parse_key(text: &str) -> Result<Self, String> {
        Ok(text.to_owned())
    }

    fn key_value(&self) -> Result<Value, String> {
        Ok(Value::String(self.clone()))
    }

    fn from_key_value(value: &Value) -> Result<Self, String> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| "key is not a string".to_string())
    }
}

impl<K: MapKey> KeyNode for K {
    fn text(&self) -> String {
        self.key_text()
    }

    fn value(&self) -> Result<Value, String> {
        self.key_value()
    }
}
